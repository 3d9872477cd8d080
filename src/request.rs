//! Chat-completion wire types for the Groq endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Message, Role};

/// Model every request is sent to
pub const GROQ_MODEL: &str = "llama3-70b-8192";

/// Sampling temperature for every request
pub const TEMPERATURE: f64 = 0.7;

/// Completion token limit for every request
pub const MAX_TOKENS: u32 = 1024;

/// Request body, built fresh per call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<Message>
  , pub temperature: f64
  , pub max_tokens: u32
}

impl ChatRequest
{   /// Wrap `messages` verbatim with the fixed model settings
    pub fn new(messages: Vec<Message>) -> Self
    {   ChatRequest
        {   model: GROQ_MODEL.to_string()
          , messages
          , temperature: TEMPERATURE
          , max_tokens: MAX_TOKENS
        }
    }
}

/// Success body. Every field is optional on the wire so a sparse
/// body still parses; callers decide what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub id: String
  , #[serde(default)]
    pub object: String
  , #[serde(default)]
    pub created: u64
  , #[serde(default)]
    pub model: String
  , #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>
}

impl ChatResponse
{   /// Content of the first choice, if present and non-empty
    pub fn first_content(&self) -> Option<&str>
    {   self.choices
          .first()
          .and_then(|c| c.message.content.as_deref())
          .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub index: u32
  , #[serde(default)]
    pub message: ReplyMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

/// Message inside a choice; both fields may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyMessage
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub prompt_tokens: u32
  , #[serde(default)]
    pub completion_tokens: u32
  , #[serde(default)]
    pub total_tokens: u32
}

/// Fields read from an error body `{ "error": { message, type, code } }`.
/// Built from a loose JSON value so an oddly shaped envelope still
/// yields whatever is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo
{   pub message: Option<String>
  , pub code: Option<String>
  , pub kind: Option<String>
}

impl ErrorInfo
{   pub fn from_body(body: &Value) -> Self
    {   let error = match body.get("error")
        {   Some(error) if error.is_object() => error
          , _ => return ErrorInfo::default()
        };
        ErrorInfo
        {   message: error.get("message")
              .and_then(Value::as_str)
              .map(str::to_string)
          , code: error.get("code").and_then(scalar_text)
          , kind: error.get("type").and_then(scalar_text)
        }
    }
}

/// Strings as-is, numbers and booleans printed; null and nested
/// values dropped.
fn scalar_text(value: &Value) -> Option<String>
{   match value
    {   Value::String(s) => Some(s.clone())
      , Value::Number(n) => Some(n.to_string())
      , Value::Bool(b) => Some(b.to_string())
      , _ => None
    }
}
