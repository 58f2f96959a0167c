//! llama.cpp Model Gateway
//!
//! Talks to a llama.cpp server through its OpenAI-compatible
//! `/v1/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use parlor::{ChatMessage, DomainError, GenerationConfig, ModelFailure, ModelGateway};

/// Model gateway backed by a llama.cpp HTTP server
#[derive(Clone)]
pub struct LlamaCppGateway {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_tokens: u32,
    repeat_penalty: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

impl<'a> CompletionRequest<'a> {
    fn new(messages: &'a [ChatMessage], config: &GenerationConfig) -> Self {
        Self {
            messages,
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_tokens: config.max_tokens,
            repeat_penalty: config.repeat_penalty,
            presence_penalty: config.presence_penalty,
            frequency_penalty: config.frequency_penalty,
        }
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl LlamaCppGateway {
    /// Create a gateway; every request is bounded by `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: completions_endpoint(base_url),
        })
    }
}

fn completions_endpoint(base_url: &str) -> String {
    format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
}

fn transport_failure(err: reqwest::Error) -> ModelFailure {
    if err.is_timeout() {
        ModelFailure::Timeout
    } else {
        ModelFailure::Transport(err.to_string())
    }
}

/// Extract the first choice's text from a completion body
fn parse_completion(body: &str) -> Result<String, ModelFailure> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| ModelFailure::Decode(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(ModelFailure::EmptyChoices)
}

#[async_trait]
impl ModelGateway for LlamaCppGateway {
    async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<String, DomainError> {
        let request = CompletionRequest::new(messages, config);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;

        if !status.is_success() {
            tracing::warn!(status = %status, body = %body, "llama.cpp returned an error status");
            return Err(ModelFailure::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let reply = parse_completion(&body)?;
        tracing::debug!(
            messages = messages.len(),
            reply_len = reply.len(),
            "Chat completion received"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            completions_endpoint("http://localhost:8080/"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint("http://llama:8080"),
            "http://llama:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![
            ChatMessage::system("You are Bob."),
            ChatMessage::user("Hello"),
        ];
        let request = CompletionRequest::new(&messages, &GenerationConfig::default());
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["top_k"], 0);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert!((body["repeat_penalty"].as_f64().unwrap() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there!"}},
                      {"message":{"role":"assistant","content":"ignored"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Hi there!");
    }

    #[test]
    fn test_parse_empty_choices() {
        assert_eq!(
            parse_completion(r#"{"choices":[]}"#).unwrap_err(),
            ModelFailure::EmptyChoices
        );
        assert_eq!(
            parse_completion(r#"{"id":"x"}"#).unwrap_err(),
            ModelFailure::EmptyChoices
        );
    }

    #[test]
    fn test_parse_garbage_is_decode_failure() {
        assert!(matches!(
            parse_completion("<html>bad gateway</html>"),
            Err(ModelFailure::Decode(_))
        ));
    }

    async fn complete_against(listener_port: u16, timeout: Duration) -> DomainError {
        let gateway =
            LlamaCppGateway::new(&format!("http://127.0.0.1:{listener_port}"), timeout).unwrap();
        gateway
            .complete_chat(&[ChatMessage::user("hi")], &GenerationConfig::default())
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = complete_against(port, Duration::from_secs(2)).await;
        assert!(matches!(err, DomainError::Model(ModelFailure::Transport(_))));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            // Accept and hold the connection without answering
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let err = complete_against(port, Duration::from_millis(300)).await;
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // The JSON body is the last thing sent
            while !request.ends_with(b"}") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nboom",
                )
                .await
                .unwrap();
        });

        let err = complete_against(port, Duration::from_secs(5)).await;
        match err {
            DomainError::Model(ModelFailure::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
