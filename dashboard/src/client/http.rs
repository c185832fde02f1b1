//! HTTP transport over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::token::TokenStore;
use super::transport::{Method, Transport};
use crate::config::ClientConfig;
use crate::error::{DashboardError, DashboardResult, ErrorContext};
use crate::models::ApiResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logged on every 401. The token is left in place.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access - please check your token or role";

/// Live backend access with bearer-token injection.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> DashboardResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                DashboardError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{path}` with exactly one slash between them.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> DashboardResult<ApiResponse<Value>> {
        let request_id = Uuid::new_v4().to_string();
        let context = || {
            ErrorContext::new(format!("{} {}", method, path))
                .with_endpoint(path)
                .with_details(format!("request_id={}", request_id))
        };

        let mut builder = builder.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = self.tokens.get()? {
            builder = builder.bearer_auth(token);
        }

        log::debug!("[{}] {} {}", request_id, method, path);
        let response = builder.send().await.map_err(|e| {
            log::warn!("[{}] {} {} failed: {}", request_id, method, path, e);
            DashboardError::transport_with_context(context())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            log::warn!("[{}] reading body of {} {} failed: {}", request_id, method, path, e);
            DashboardError::transport_with_context(context().with_status(status.as_u16()))
        })?;

        if status == StatusCode::UNAUTHORIZED {
            log::error!("[{}] {}", request_id, UNAUTHORIZED_MESSAGE);
        }

        let envelope = ApiResponse::from_body(&body);
        classify_response(status, envelope, context())
    }
}

/// Map a status and an optional envelope onto the error taxonomy.
fn classify_response(
    status: StatusCode,
    envelope: Option<ApiResponse<Value>>,
    context: ErrorContext,
) -> DashboardResult<ApiResponse<Value>> {
    match (status.is_success(), envelope) {
        (true, Some(envelope)) => Ok(envelope),
        (true, None) => Err(DashboardError::Decode {
            message: "Response body is not an envelope".to_string(),
            context: context.with_status(status.as_u16()),
        }),
        (false, Some(envelope)) => {
            log::warn!("{} returned {}", context, status);
            Err(DashboardError::application_with_context(
                envelope.message.as_deref(),
                context.with_status(status.as_u16()),
            ))
        }
        (false, None) => {
            log::warn!("{} returned {} without an envelope", context, status);
            Err(DashboardError::transport_with_context(
                context.with_status(status.as_u16()),
            ))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> DashboardResult<ApiResponse<Value>> {
        let mut builder = self.client.get(self.url_for(path));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.send(Method::Get, path, builder).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> DashboardResult<ApiResponse<Value>> {
        let builder = self
            .client
            .post(self.url_for(path))
            .json(body.unwrap_or(&Value::Object(Default::default())));
        self.send(Method::Post, path, builder).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::token::MemoryTokenStore;

    fn transport(base_url: &str) -> HttpTransport {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        HttpTransport::new(&config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let t = transport("https://meals.example.edu/api/");
        assert_eq!(t.base_url(), "https://meals.example.edu/api");
        assert_eq!(t.url_for("admin/stock/list"), "https://meals.example.edu/api/admin/stock/list");
        assert_eq!(t.url_for("/admin/analytics"), "https://meals.example.edu/api/admin/analytics");
    }

    #[test]
    fn test_success_with_envelope() {
        let envelope = ApiResponse::from_body(br#"{"success": true, "data": []}"#);
        let result = classify_response(StatusCode::OK, envelope, ErrorContext::default());
        assert!(result.unwrap().success);
    }

    #[test]
    fn test_success_false_on_2xx_is_passed_through() {
        let envelope = ApiResponse::from_body(br#"{"success": false, "message": "No plan"}"#);
        let result = classify_response(StatusCode::OK, envelope, ErrorContext::default()).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn test_non_2xx_with_envelope_is_application_error() {
        let envelope = ApiResponse::from_body(br#"{"success": false, "message": "Forbidden role"}"#);
        let err = classify_response(StatusCode::FORBIDDEN, envelope, ErrorContext::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::Application { .. }));
        assert_eq!(err.message(), "Forbidden role");
        assert_eq!(err.context().status, Some(403));
    }

    #[test]
    fn test_non_2xx_without_envelope_is_transport_error() {
        let err = classify_response(StatusCode::BAD_GATEWAY, None, ErrorContext::default())
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.context().status, Some(502));
    }

    #[test]
    fn test_2xx_garbage_is_decode_error() {
        let err = classify_response(StatusCode::OK, None, ErrorContext::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Decode { .. }));
    }
}
