use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use quillmate::error::{Error, CREDENTIAL_MISSING_MESSAGE, REMOTE_FALLBACK_MESSAGE};
use quillmate::providers::{HttpReply, HttpRequest, HttpTransport};
use quillmate::{ChatResponse, GroqClient, GroqConfig, Message};

/// Transport that replays queued replies and records every request
#[derive(Clone, Default)]
struct MockTransport
{   replies: Arc<Mutex<VecDeque<Result<HttpReply, Error>>>>
  , requests: Arc<Mutex<Vec<HttpRequest>>>
}

impl MockTransport
{   fn replying(reply: Result<HttpReply, Error>) -> Self
    {   let transport = MockTransport::default();
        transport.replies.lock().unwrap().push_back(reply);
        transport
    }

    fn with_status(status: u16, body: &str) -> Self
    {   MockTransport::replying(Ok(HttpReply
        {   status
          , body: body.to_string()
        }))
    }

    fn requests(&self) -> Vec<HttpRequest>
    {   self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport
{   async fn post(&self, request: HttpRequest)
      -> Result<HttpReply, Error>
    {   self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap()
          .pop_front()
          .unwrap_or_else(|| Err(Error::TransportFailure(
            "no reply queued".to_string()
          )))
    }
}

fn init_logging()
{   let _ = env_logger::builder().is_test(true).try_init();
}

fn client(transport: &MockTransport) -> GroqClient<MockTransport>
{   GroqClient::with_transport(
      GroqConfig::with_api_key("test-api-key"),
      transport.clone()
    )
}

const SUCCESS_BODY: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "created": 1717000000,
    "model": "llama3-70b-8192",
    "choices": [
        {
            "index": 0,
            "message": { "role": "assistant", "content": "Hi there!" },
            "finish_reason": "stop"
        }
    ],
    "usage": { "prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12 }
}"#;

// ===== Request construction =====

#[tokio::test]
async fn test_successful_call_returns_parsed_body()
{   init_logging();
    let transport = MockTransport::with_status(200, SUCCESS_BODY);
    let messages = vec![
      Message::system("You are a writing assistant.")
    , Message::user("Hello")
    , Message::assistant("Hi!")
    , Message::user("  Fix   my spacing  ")
    ];

    let response = assert_ok!(client(&transport).complete(messages).await);

    let expected: ChatResponse = serde_json::from_str(SUCCESS_BODY).unwrap();
    assert_eq!(response, expected);
    assert_eq!(response.first_content(), Some("Hi there!"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
      request.url,
      "https://api.groq.com/openai/v1/chat/completions"
    );
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("authorization"), Some("Bearer test-api-key"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
      body,
      json!({
        "model": "llama3-70b-8192",
        "messages": [
          { "role": "system", "content": "You are a writing assistant." },
          { "role": "user", "content": "Hello" },
          { "role": "assistant", "content": "Hi!" },
          { "role": "user", "content": "  Fix   my spacing  " }
        ],
        "temperature": 0.7,
        "max_tokens": 1024
      })
    );
}

#[tokio::test]
async fn test_sparse_success_body_is_not_validated()
{   let transport = MockTransport::with_status(
      200,
      r#"{ "choices": [{ "message": { "content": "Hi there!" } }] }"#
    );
    let response = assert_ok!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert_eq!(response.first_content(), Some("Hi there!"));
    assert!(response.usage.is_none());

    let empty = MockTransport::with_status(200, r#"{ "choices": [] }"#);
    let response = assert_ok!(
      client(&empty).complete(vec![Message::user("Hello")]).await
    );
    assert!(response.choices.is_empty());
}

#[tokio::test]
async fn test_custom_api_base()
{   let transport = MockTransport::with_status(200, SUCCESS_BODY);
    let config = GroqConfig
    {   api_key: Some("k".to_string())
      , api_base: Some("http://localhost:8080/v1/".to_string())
    };
    let client = GroqClient::with_transport(config, transport.clone());
    assert_ok!(client.complete(vec![Message::user("Hi")]).await);
    assert_eq!(
      transport.requests()[0].url,
      "http://localhost:8080/v1/chat/completions"
    );
}

// ===== Credential =====

#[tokio::test]
async fn test_missing_credential_makes_no_request()
{   for api_key in [None, Some(String::new())]
    {   let transport = MockTransport::with_status(200, SUCCESS_BODY);
        let config = GroqConfig
        {   api_key
          , api_base: None
        };
        let client = GroqClient::with_transport(config, transport.clone());

        let err = assert_err!(client.complete(vec![Message::user("Hello")]).await);
        assert_eq!(err, Error::CredentialMissing);
        assert_eq!(err.to_string(), CREDENTIAL_MISSING_MESSAGE);
        assert!(transport.requests().is_empty());
    }
}

// ===== Error mapping =====

#[tokio::test]
async fn test_api_error_uses_envelope_message()
{   let transport = MockTransport::with_status(
      401,
      r#"{ "error": { "message": "Invalid API key" } }"#
    );
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert_eq!(err.message(), "Invalid API key");
    assert_eq!(err.to_string(), "Invalid API key");
    assert_eq!(err.code(), None);
}

#[tokio::test]
async fn test_api_error_keeps_code_and_type()
{   let transport = MockTransport::with_status(
      429,
      r#"{ "error": {
            "message": "Rate limit reached",
            "type": "tokens",
            "code": "rate_limit_exceeded"
      } }"#
    );
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert_eq!(
      err,
      Error::RemoteRejected
      {   status: 429
        , message: "Rate limit reached".to_string()
        , code: Some("rate_limit_exceeded".to_string())
        , kind: Some("tokens".to_string())
      }
    );
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_api_error_without_message_falls_back()
{   for body in [r#"{ "error": {} }"#, r#"{ "error": { "message": "" } }"#, "{}"]
    {   let transport = MockTransport::with_status(500, body);
        let err = assert_err!(
          client(&transport).complete(vec![Message::user("Hello")]).await
        );
        assert_eq!(err.message(), REMOTE_FALLBACK_MESSAGE);
    }
}

#[tokio::test]
async fn test_api_error_with_numeric_code_keeps_message()
{   let transport = MockTransport::with_status(
      503,
      r#"{"error":{"message":"Rate limited","code":429}}"#
    );
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert_eq!(
      err,
      Error::RemoteRejected
      {   status: 503
        , message: "Rate limited".to_string()
        , code: Some("429".to_string())
        , kind: None
      }
    );
}

#[tokio::test]
async fn test_api_error_as_plain_string_falls_back()
{   let transport = MockTransport::with_status(
      503,
      r#"{"error":"Service unavailable"}"#
    );
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert_eq!(
      err,
      Error::RemoteRejected
      {   status: 503
        , message: REMOTE_FALLBACK_MESSAGE.to_string()
        , code: None
        , kind: None
      }
    );
}

#[tokio::test]
async fn test_unparseable_error_body_is_unexpected()
{   let transport = MockTransport::with_status(502, "<html>Bad Gateway</html>");
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert!(matches!(err, Error::UnexpectedFailure(_)));
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_unparseable_success_body_is_unexpected()
{   let transport = MockTransport::with_status(200, "not json");
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert!(matches!(err, Error::UnexpectedFailure(_)));
}

#[tokio::test]
async fn test_network_error_passes_message_through()
{   let transport = MockTransport::replying(Err(Error::TransportFailure(
      "Network error".to_string()
    )));
    let err = assert_err!(
      client(&transport).complete(vec![Message::user("Hello")]).await
    );
    assert_eq!(err.message(), "Network error");
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_refused_connection_keeps_reqwest_message()
{   init_logging();
    let config = GroqConfig
    {   api_key: Some("k".to_string())
      , api_base: Some("http://127.0.0.1:1/v1".to_string())
    };
    let url = config.endpoint();
    let err = assert_err!(
      GroqClient::new(config).complete(vec![Message::user("Hi")]).await
    );

    let direct = assert_err!(
      reqwest::Client::new().post(&url).body("{}").send().await
    );
    assert_eq!(err, Error::TransportFailure(direct.to_string()));
    assert!(err.message().contains("127.0.0.1:1"));
}

// ===== Configuration =====

#[test]
fn test_config_loads_from_file()
{   let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groq.json");
    std::fs::write(&path, r#"{ "api_key": "from-file" }"#).unwrap();

    let config = assert_ok!(GroqConfig::load(&path));
    assert_eq!(config.api_key(), Some("from-file"));
    assert_eq!(
      config.endpoint(),
      "https://api.groq.com/openai/v1/chat/completions"
    );
}

#[test]
fn test_config_rejects_bad_files()
{   let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = assert_err!(GroqConfig::load(&missing));
    assert!(matches!(err, Error::InvalidConfiguration(_)));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ api_key").unwrap();
    let err = assert_err!(GroqConfig::load(&broken));
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn test_config_without_key_loads()
{   let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "{}").unwrap();

    let config = assert_ok!(GroqConfig::load(&path));
    assert_eq!(config.api_key(), None);
}

// ===== Live =====

#[tokio::test]
#[ignore]
async fn test_groq_send_prompt()
{   init_logging();
    let config = GroqConfig::from_env();
    if config.api_key().is_none()
    {   println!("Skipping: GROQ_API_KEY not set");
        return;
    }

    let client = GroqClient::new(config);
    match client.complete(vec![Message::user("Say hello")]).await
    {   Ok(response) => {
          println!("Response: {:?}", response.first_content());
          assert!(response.first_content().is_some());
        }
      , Err(e) => {
          println!("API Error: {}", e);
        }
    }
}
