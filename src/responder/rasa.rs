//! Rasa REST channel provider
//!
//! Talks to `POST {base}/webhooks/rest/webhook` on a running Rasa server.

use super::{ResponderError, ResponseProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply when the bot answered but none of its messages carry text
pub const NOT_UNDERSTOOD_REPLY: &str =
    "Maaf, saya tidak mengerti. Bisakah Anda menjelaskan lebih lanjut?";

/// Reply when the bot produced no messages at all
pub const NO_RESPONSE_REPLY: &str =
    "Maaf, saya tidak dapat memproses permintaan Anda saat ini. Bisakah Anda coba lagi?";

/// Rasa provider implementation
pub struct RasaProvider {
    client: Client,
    webhook_url: String,
}

impl RasaProvider {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ResponderError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ResponderError::unavailable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url: format!("{}/webhooks/rest/webhook", base_url.trim_end_matches('/')),
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> ResponderError {
        match status.as_u16() {
            404 => ResponderError::unavailable("REST channel not enabled on the Rasa server"),
            500..=599 => ResponderError::server_error(format!("Server error: {body}")),
            _ => ResponderError::server_error(format!("HTTP {status}: {body}")),
        }
    }
}

/// Pick the reply text out of the bot's messages
pub fn reply_from_messages(messages: &[RasaMessage]) -> String {
    if messages.is_empty() {
        return NO_RESPONSE_REPLY.to_string();
    }
    messages
        .iter()
        .find_map(|m| m.text.clone())
        .unwrap_or_else(|| NOT_UNDERSTOOD_REPLY.to_string())
}

#[async_trait]
impl ResponseProvider for RasaProvider {
    async fn respond(&self, sender: &str, text: &str) -> Result<String, ResponderError> {
        let response = self
            .client
            .post(self.webhook_url())
            .json(&RasaRequest {
                sender,
                message: text,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResponderError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ResponderError::network(format!("Connection failed: {e}"))
                } else {
                    ResponderError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResponderError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_error(status, &body));
        }

        let messages: Vec<RasaMessage> = serde_json::from_str(&body).map_err(|e| {
            ResponderError::invalid_response(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Ok(reply_from_messages(&messages))
    }

    fn name(&self) -> &'static str {
        "rasa"
    }
}

// Rasa REST channel types

#[derive(Debug, Serialize)]
struct RasaRequest<'a> {
    sender: &'a str,
    message: &'a str,
}

/// One bot utterance from the REST channel
#[derive(Debug, Clone, Deserialize)]
pub struct RasaMessage {
    #[allow(dead_code)] // Echoed sender, not needed for the reply
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    fn msg(text: Option<&str>) -> RasaMessage {
        RasaMessage {
            recipient_id: Some("s".to_string()),
            text: text.map(String::from),
        }
    }

    #[test]
    fn test_first_text_wins() {
        let messages = vec![msg(None), msg(Some("Halo")), msg(Some("Apa kabar"))];
        assert_eq!(reply_from_messages(&messages), "Halo");
    }

    #[test]
    fn test_no_messages_and_no_text_replies() {
        assert_eq!(reply_from_messages(&[]), NO_RESPONSE_REPLY);
        assert_eq!(reply_from_messages(&[msg(None)]), NOT_UNDERSTOOD_REPLY);
    }

    #[test]
    fn test_webhook_url_strips_trailing_slash() {
        let provider = RasaProvider::new("http://localhost:5005/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.webhook_url(), "http://localhost:5005/webhooks/rest/webhook");
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_respond_against_rest_channel() {
        let router = Router::new().route(
            "/webhooks/rest/webhook",
            post(|Json(body): Json<Value>| async move {
                Json(json!([{
                    "recipient_id": body["sender"],
                    "text": format!("kamu bilang: {}", body["message"].as_str().unwrap_or_default())
                }]))
            }),
        );
        let base = serve(router).await;
        let provider = RasaProvider::new(&base, Duration::from_secs(5)).unwrap();

        let reply = provider.respond("sesi-1", "sedih").await.unwrap();
        assert_eq!(reply, "kamu bilang: sedih");
    }

    #[tokio::test]
    async fn test_server_error_is_classified() {
        let router = Router::new().route(
            "/webhooks/rest/webhook",
            post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(router).await;
        let provider = RasaProvider::new(&base, Duration::from_secs(5)).unwrap();

        let err = provider.respond("sesi-1", "halo").await.unwrap_err();
        assert_eq!(err.kind, super::super::ResponderErrorKind::ServerError);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            RasaProvider::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        assert!(provider.respond("sesi-1", "halo").await.is_err());
    }
}
