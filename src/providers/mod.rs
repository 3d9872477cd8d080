//! Chat-completion provider implementations

pub mod groq;

// Re-export for convenience
pub use groq::{GroqClient, HttpReply, HttpRequest, HttpTransport, ReqwestTransport};

use async_trait::async_trait;

/// Single-shot chat completion, the seam the conversation
/// controller talks to.
#[async_trait]
pub trait ChatCompletion: Send + Sync
{   /// Send `messages` as one request and return the parsed body
    async fn call(
      &self
    , messages: Vec<crate::Message>
    ) -> Result<crate::request::ChatResponse, crate::error::Error>;
}

#[async_trait]
impl<C> ChatCompletion for std::sync::Arc<C>
where
  C: ChatCompletion + ?Sized
{   async fn call(
      &self
    , messages: Vec<crate::Message>
    ) -> Result<crate::request::ChatResponse, crate::error::Error>
    {   (**self).call(messages).await
    }
}
