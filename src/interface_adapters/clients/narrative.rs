use crate::domain::ports::{
    Clock, NarrativeError, NarrativeMessage, NarrativeRequest, NarrativeService,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SENDER: &str = "Overseer AI";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    level: u32,
    score: u64,
    event: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
    #[serde(default)]
    sender: Option<String>,
}

// Thin reqwest client for the flavor-text generator.
#[derive(Clone)]
pub struct NarrativeClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    clock: Arc<dyn Clock>,
}

impl NarrativeClient {
    /// Without both an endpoint and an API key every call reports `NotConfigured`.
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            api_key,
            clock,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }
}

#[async_trait]
impl NarrativeService for NarrativeClient {
    async fn generate(&self, request: NarrativeRequest) -> Result<NarrativeMessage, NarrativeError> {
        let (Some(endpoint), Some(api_key)) = (&self.endpoint, &self.api_key) else {
            return Err(NarrativeError::NotConfigured);
        };

        let response = self
            .http
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&GenerateRequest {
                level: request.level,
                score: request.score,
                event: request.event.as_str(),
            })
            .send()
            .await
            .map_err(|_| NarrativeError::Unavailable)?;

        if !response.status().is_success() {
            return Err(NarrativeError::Unavailable);
        }

        let body = response
            .json::<GenerateResponse>()
            .await
            .map_err(|_| NarrativeError::InvalidResponse)?;
        let text = body.text.trim();
        if text.is_empty() {
            return Err(NarrativeError::InvalidResponse);
        }

        Ok(NarrativeMessage {
            text: text.to_string(),
            sender: body.sender.unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            timestamp: self.clock.now_epoch_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NarrativeEvent;
    use axum::{Json, Router, http::HeaderMap, routing::post};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now_epoch_seconds(&self) -> u64 {
            500
        }
    }

    fn request() -> NarrativeRequest {
        NarrativeRequest {
            level: 3,
            score: 1200,
            event: NarrativeEvent::Success,
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let address = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{address}/generate")
    }

    fn client(endpoint: Option<String>, api_key: Option<&str>) -> NarrativeClient {
        NarrativeClient::new(
            endpoint,
            api_key.map(str::to_string),
            Duration::from_secs(2),
            Arc::new(FixedClock),
        )
        .expect("client builds")
    }

    #[tokio::test]
    async fn when_api_key_is_missing_then_generate_reports_not_configured() {
        let client = client(Some("http://127.0.0.1:9/generate".to_string()), None);

        assert!(!client.is_configured());
        assert!(matches!(
            client.generate(request()).await,
            Err(NarrativeError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn when_service_answers_then_text_and_request_fields_round_trip() {
        let router = Router::new().route(
            "/generate",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer secret");
                Json(serde_json::json!({
                    "text": format!(
                        "{} level {} score {} auth {}",
                        body["event"].as_str().unwrap_or_default(),
                        body["level"],
                        body["score"],
                        authorized
                    ),
                }))
            }),
        );
        let endpoint = serve(router).await;

        let message = client(Some(endpoint), Some("secret"))
            .generate(request())
            .await
            .expect("generated");

        assert_eq!(message.text, "success level 3 score 1200 auth true");
        assert_eq!(message.sender, DEFAULT_SENDER);
        assert_eq!(message.timestamp, 500);
    }

    #[tokio::test]
    async fn when_service_returns_an_error_status_then_it_is_unavailable() {
        let router = Router::new().route(
            "/generate",
            post(|| async { axum::http::StatusCode::SERVICE_UNAVAILABLE }),
        );
        let endpoint = serve(router).await;

        let result = client(Some(endpoint), Some("secret")).generate(request()).await;

        assert!(matches!(result, Err(NarrativeError::Unavailable)));
    }

    #[tokio::test]
    async fn when_service_returns_garbage_then_response_is_invalid() {
        let router = Router::new().route("/generate", post(|| async { "not json" }));
        let endpoint = serve(router).await;

        let result = client(Some(endpoint), Some("secret")).generate(request()).await;

        assert!(matches!(result, Err(NarrativeError::InvalidResponse)));
    }
}
