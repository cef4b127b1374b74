//! Diagnosis API client.
//!
//! One attempt per call: no retries and no caching. Timeouts are enforced by
//! the underlying `reqwest::Client`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use smartfixer_shared::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_API_BASE_URL, DIAGNOSE_PATH, HEALTH_PATH, REQUEST_TIMEOUT_SECS,
};
use smartfixer_shared::{DiagnosisRequest, DiagnosisResult};
use tracing::{debug, info, warn};

use crate::error::NetError;

/// Anything that can turn a request into a diagnosis.
#[async_trait]
pub trait DiagnosisApi: Send + Sync {
    async fn diagnose(&self, request: &DiagnosisRequest) -> Result<DiagnosisResult, NetError>;
}

/// Connection settings for [`HttpDiagnosisClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for the whole exchange, including upload and response body.
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct HttpDiagnosisClient {
    http: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl HttpDiagnosisClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, NetError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let http = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(concat!("smartfixer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetError::Transport)?;

        info!(base_url = %base_url, "diagnosis client ready");

        Ok(Self { http, base_url })
    }

    /// Probe `GET /health`. Returns `Ok(false)` when the server answers but
    /// reports anything other than `ok`.
    pub async fn health(&self) -> Result<bool, NetError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Ok(false);
        }
        let body = resp.text().await?;
        let health: HealthResponse = serde_json::from_str(&body)?;
        Ok(health.status == "ok")
    }

    fn endpoint(&self, path: &str) -> Result<Url, NetError> {
        self.base_url
            .join(path)
            .map_err(|e| NetError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))
    }
}

#[async_trait]
impl DiagnosisApi for HttpDiagnosisClient {
    async fn diagnose(&self, request: &DiagnosisRequest) -> Result<DiagnosisResult, NetError> {
        let url = self.endpoint(DIAGNOSE_PATH)?;
        debug!(
            url = %url,
            description_len = request.description.len(),
            with_image = request.image.is_some(),
            "sending diagnosis request"
        );

        let resp = self.http.post(url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let detail = error_detail(&body);
            warn!(status = status.as_u16(), %detail, "diagnosis request rejected");
            return Err(NetError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let result: DiagnosisResult = serde_json::from_str(&body)?;
        info!(title = %result.title, category = %result.category, "diagnosis received");
        Ok(result)
    }
}

// Relative joins drop the last path segment unless the base ends with `/`.
fn parse_base_url(raw: &str) -> Result<Url, NetError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).map_err(|e| NetError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(NetError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

/// Pull FastAPI's `detail` out of an error body, or fall back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> HttpDiagnosisClient {
        HttpDiagnosisClient::new(&ClientSettings {
            base_url,
            ..ClientSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("https://example.com/api").unwrap();
        assert_eq!(url.join("diagnose").unwrap().as_str(), "https://example.com/api/diagnose");
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(NetError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_error_detail_prefers_fastapi_detail() {
        assert_eq!(error_detail(r#"{"detail":"AI service error"}"#), "AI service error");
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(""), "no details");
    }

    #[tokio::test]
    async fn test_diagnose_posts_json_and_decodes_reply() {
        let router = Router::new().route(
            "/api/diagnose",
            post(|Json(body): Json<Value>| async move {
                assert!(body.get("image_base64").is_none());
                Json(json!({
                    "title": format!("Fix for {}", body["description"].as_str().unwrap_or("")),
                    "difficulty": "Easy",
                    "estimated_time": "30-45 minutes",
                    "tools": ["wrench"],
                    "steps": ["Turn off water"],
                    "category": "plumbing",
                    "model": "ignored"
                }))
            }),
        );
        let base = serve(router).await;
        let client = client_for(format!("{base}/api"));

        let result = client
            .diagnose(&DiagnosisRequest::text("leaky faucet"))
            .await
            .unwrap();
        assert_eq!(result.title, "Fix for leaky faucet");
        assert_eq!(result.tools, vec!["wrench".to_string()]);
        assert_eq!(result.category, "plumbing");
    }

    #[tokio::test]
    async fn test_image_fields_reach_the_server() {
        let router = Router::new().route(
            "/diagnose",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "title": body["image_media_type"],
                    "difficulty": "Medium",
                    "estimated_time": "1 hour",
                    "tools": [],
                    "steps": [body["image_base64"]],
                }))
            }),
        );
        let client = client_for(serve(router).await);
        let request = DiagnosisRequest::text("cracked tile").with_image(
            smartfixer_shared::ImageAttachment {
                data: "QUJD".into(),
                media_type: "image/jpeg".into(),
            },
        );

        let result = client.diagnose(&request).await.unwrap();
        assert_eq!(result.title, "image/jpeg");
        assert_eq!(result.steps, vec!["QUJD".to_string()]);
        assert_eq!(result.category, "general");
    }

    #[tokio::test]
    async fn test_server_error_carries_detail() {
        let router = Router::new().route(
            "/diagnose",
            post(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "detail": "AI service error" })),
                )
            }),
        );
        let client = client_for(serve(router).await);

        let err = client
            .diagnose(&DiagnosisRequest::text("no power"))
            .await
            .unwrap_err();
        match err {
            NetError::Status { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "AI service error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_reply_is_a_decode_error() {
        let router = Router::new().route("/diagnose", post(|| async { "{\"title\": 42" }));
        let client = client_for(serve(router).await);

        let err = client
            .diagnose(&DiagnosisRequest::text("drafty window"))
            .await
            .unwrap_err();
        assert!(matches!(err, NetError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let router = Router::new().route(
            "/diagnose",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = serve(router).await;
        let client = HttpDiagnosisClient::new(&ClientSettings {
            base_url: base,
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_millis(200),
        })
        .unwrap();

        let err = client
            .diagnose(&DiagnosisRequest::text("squeaky door"))
            .await
            .unwrap_err();
        assert!(matches!(err, NetError::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}"));

        let err = client
            .diagnose(&DiagnosisRequest::text("clogged drain"))
            .await
            .unwrap_err();
        assert!(matches!(err, NetError::Transport(_) | NetError::Timeout));
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let router = Router::new().route("/health", get(|| async { Json(json!({ "status": "ok" })) }));
        let client = client_for(serve(router).await);
        assert!(client.health().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_is_false_on_error_status() {
        let router = Router::new().route(
            "/health",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let client = client_for(serve(router).await);
        assert!(!client.health().await.unwrap());
    }
}
