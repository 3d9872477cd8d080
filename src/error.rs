use std::fmt;

/// Message used when the remote error envelope carries no message.
pub const REMOTE_FALLBACK_MESSAGE: &str
  = "An error occurred while calling the Groq API";

/// Message used when a failure carries nothing printable.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Message reported when no credential was configured.
pub const CREDENTIAL_MISSING_MESSAGE: &str
  = "Groq API key is missing. Please set GROQ_API_KEY \
     (or VITE_GROQ_API_KEY) in your environment.";

/// Error type for quillmate operations.
/// Implements Clone so it can be stored in published state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No credential configured; no request was attempted
    CredentialMissing
  , /// Endpoint answered with a non-success status
    RemoteRejected
    {   status: u16
      , message: String
      , code: Option<String>
      , kind: Option<String>
    }
  , /// Request never got a response (DNS, refused, timeout)
    TransportFailure(String)
  , /// Anything else, e.g. an unparseable body
    UnexpectedFailure(String)
  , /// Config file could not be read or parsed
    InvalidConfiguration(String)
}

impl Error
{   /// Build an `UnexpectedFailure`, falling back to the generic
    /// message when `message` is empty.
    pub fn unexpected(message: impl Into<String>) -> Self
    {   let message = message.into();
        if message.trim().is_empty()
        {   Error::UnexpectedFailure(UNEXPECTED_MESSAGE.to_string())
        } else
        {   Error::UnexpectedFailure(message)
        }
    }

    /// Human-readable message, exactly as shown to the end user
    pub fn message(&self) -> &str
    {   match self
        {   Error::CredentialMissing => CREDENTIAL_MISSING_MESSAGE
          , Error::RemoteRejected { message, .. } => message.as_str()
          , Error::TransportFailure(msg) => msg.as_str()
          , Error::UnexpectedFailure(msg) => msg.as_str()
          , Error::InvalidConfiguration(msg) => msg.as_str()
        }
    }

    /// Remote error code, only set for `RemoteRejected`
    pub fn code(&self) -> Option<&str>
    {   match self
        {   Error::RemoteRejected { code, .. } => code.as_deref()
          , _ => None
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   f.write_str(self.message())
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::unexpected(e.to_string())
    }
}
