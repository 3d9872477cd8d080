//! Credential and endpoint configuration for the Groq client

use std::path::Path;

use log::{debug, error};
use serde::{Deserialize, Serialize};

/// Default API base; `/chat/completions` is appended.
pub const GROQ_API_BASE: &str
  = "https://api.groq.com/openai/v1";

/// Environment variables checked by `from_env`, in order.
pub const API_KEY_VARS: [&str; 2]
  = ["GROQ_API_KEY", "VITE_GROQ_API_KEY"];

/// Groq client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroqConfig
{   /// Bearer credential
    #[serde(default)]
    pub api_key: Option<String>
  , /// API base URL (if custom)
    #[serde(default)]
    pub api_base: Option<String>
}

impl GroqConfig
{   /// Configuration with an explicit credential
    pub fn with_api_key(api_key: impl Into<String>) -> Self
    {   GroqConfig
        {   api_key: Some(api_key.into())
          , api_base: None
        }
    }

    /// Read the credential from the process environment.
    /// Never fails; a missing key is reported when calling.
    pub fn from_env() -> Self
    {   let api_key = API_KEY_VARS
          .iter()
          .find_map(|var| {
            std::env::var(var).ok()
              .filter(|v| !v.is_empty())
              .map(|v| {
                debug!("Using credential from {}", var);
                v
              })
          });
        GroqConfig
        {   api_key
          , api_base: None
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)
          .map_err(|e| {
            error!("Failed to read {}: {}", path.display(), e);
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        serde_json::from_str(&text)
          .map_err(|e| {
            error!("Failed to parse {}: {}", path.display(), e);
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })
    }

    /// Full chat-completion URL
    pub fn endpoint(&self) -> String
    {   let base = self.api_base
          .as_deref()
          .unwrap_or(GROQ_API_BASE)
          .trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// The credential, if present and non-empty
    pub fn api_key(&self) -> Option<&str>
    {   self.api_key
          .as_deref()
          .filter(|k| !k.is_empty())
    }
}
