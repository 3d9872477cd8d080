use async_trait::async_trait;
use log::{debug, trace, error};

use crate::config::GroqConfig;
use crate::error::{Error, REMOTE_FALLBACK_MESSAGE};
use crate::request::{ChatRequest, ChatResponse, ErrorInfo};

// ===== Transport =====

/// Outgoing POST as handed to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest
{   pub url: String
  , pub headers: Vec<(String, String)>
  , pub body: String
}

impl HttpRequest
{   /// Value of the first header named `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str>
    {   self.headers
          .iter()
          .find(|(k, _)| k.eq_ignore_ascii_case(name))
          .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply
{   pub status: u16
  , pub body: String
}

impl HttpReply
{   pub fn is_success(&self) -> bool
    {   (200..300).contains(&self.status)
    }
}

/// Performs one HTTP POST. Implementations report a failure
/// before any response as `Error::TransportFailure`.
#[async_trait]
pub trait HttpTransport: Send + Sync
{   async fn post(&self, request: HttpRequest)
      -> Result<HttpReply, Error>;
}

/// `reqwest`-backed transport; relies on reqwest's default timeouts
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport
{   http_client: reqwest::Client
}

impl ReqwestTransport
{   pub fn new() -> Self
    {   ReqwestTransport
        {   http_client: reqwest::Client::new()
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport
{   async fn post(&self, request: HttpRequest)
      -> Result<HttpReply, Error>
    {   let mut builder = self.http_client.post(&request.url);
        for (name, value) in &request.headers
        {   builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
          .body(request.body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::TransportFailure(e.to_string())
          })?;

        let status = response.status().as_u16();
        trace!("Groq response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::unexpected(e.to_string())
        })?;

        Ok(HttpReply { status, body })
    }
}

// ===== Groq Client =====

/// Chat-completion client for the Groq endpoint.
///
/// Makes exactly one request per `call`: no retries, no caching,
/// no timeout of its own.
pub struct GroqClient<T = ReqwestTransport>
{   config: GroqConfig
  , transport: T
}

impl GroqClient<ReqwestTransport>
{   /// Client over the default `reqwest` transport
    pub fn new(config: GroqConfig) -> Self
    {   debug!("Creating GroqClient");
        GroqClient::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> GroqClient<T>
{   pub fn with_transport(config: GroqConfig, transport: T) -> Self
    {   GroqClient
        {   config
          , transport
        }
    }

    pub fn config(&self) -> &GroqConfig
    {   &self.config
    }

    /// Send `messages` verbatim and return the parsed response body.
    pub async fn complete(
      &self
    , messages: Vec<crate::Message>
    ) -> Result<ChatResponse, Error>
    {   let api_key = self.config.api_key().ok_or_else(|| {
          error!("No Groq API key configured");
          Error::CredentialMissing
        })?;

        debug!("Sending {} message(s) to Groq", messages.len());
        let request = ChatRequest::new(messages);
        trace!("Groq request: {:?}", request);

        let http_request = HttpRequest
        {   url: self.config.endpoint()
          , headers: vec![
              ( "Content-Type".to_string()
              , "application/json".to_string()
              )
            , ( "Authorization".to_string()
              , format!("Bearer {}", api_key)
              )
            ]
          , body: serde_json::to_string(&request)?
        };

        let reply = self.transport.post(http_request).await?;

        if !reply.is_success()
        {   return Err(rejection(reply));
        }

        let response: ChatResponse
          = serde_json::from_str(&reply.body).map_err(|e| {
            error!("Parse error: {}", e);
            Error::unexpected(e.to_string())
          })?;

        debug!("Groq returned {} choice(s)", response.choices.len());
        Ok(response)
    }
}

/// Map a non-success reply onto `RemoteRejected`. Any JSON body
/// counts, with the generic message when no string message is
/// found; only a body that is not JSON at all is unexpected.
fn rejection(reply: HttpReply) -> Error
{   let body: serde_json::Value = match serde_json::from_str(&reply.body)
    {   Ok(body) => body
      , Err(e) => {
          error!(
            "Unparseable Groq error body (status {}): {}",
            reply.status, e
          );
          return Error::unexpected(e.to_string());
        }
    };

    let info = ErrorInfo::from_body(&body);
    let message = info.message
      .filter(|m| !m.is_empty())
      .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string());
    error!("Groq API error (status {}): {}", reply.status, message);

    Error::RemoteRejected
    {   status: reply.status
      , message
      , code: info.code
      , kind: info.kind
    }
}

#[async_trait]
impl<T: HttpTransport> crate::providers::ChatCompletion for GroqClient<T>
{   async fn call(
      &self
    , messages: Vec<crate::Message>
    ) -> Result<ChatResponse, Error>
    {   self.complete(messages).await
    }
}
