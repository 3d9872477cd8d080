pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod client;
pub mod enhance;
pub mod suggestions;
use serde::{Deserialize, Serialize};

/*

quillmate is the core of a small writing assistant: the editor page
sends text to a Groq-hosted model and shows the answer, plus a couple
of offline helpers the page uses while the user writes.

quillmate/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Shared message types and re-exports
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # Credential and endpoint configuration
│   ├── request.rs      # Chat-completion wire types
│   ├── providers/      # Remote endpoints
│   │   ├── mod.rs      # ChatCompletion seam
│   │   └── groq.rs     # Groq client + HTTP transport
│   ├── client.rs       # Conversation controller and its state
│   ├── enhance.rs      # Offline "enhance text" rewrite
│   ├── suggestions.rs  # Sidebar catalogs
│   └── main.rs         # Terminal front end
└── tests/

*/

pub use client::{ConversationController, ConversationState};
pub use config::GroqConfig;
pub use error::Error;
pub use providers::{ChatCompletion, GroqClient};
pub use request::ChatResponse;

/// QUILLMATE STRUCTURES:

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   User
  , Assistant
  , System
}

/// One role-tagged chat message. Order within a request is
/// chronological; the role never changes once built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message
{   pub role: Role
  , pub content: String
}

impl Message
{   pub fn new(role: Role, content: impl Into<String>) -> Self
    {   Message
        {   role
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   Message::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self
    {   Message::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self
    {   Message::new(Role::System, content)
    }
}
