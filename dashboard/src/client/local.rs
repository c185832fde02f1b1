//! In-memory transport backed by a route table.
//!
//! Used by tests and for offline development. Each route maps a method and
//! path to a fixed envelope, a simulated failure, or a handler closure.
//! Every request is recorded so tests can assert on traffic.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::transport::{Method, Transport};
use crate::error::{DashboardError, DashboardResult, ErrorContext};
use crate::models::ApiResponse;

/// A request seen by [`LocalTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> DashboardResult<ApiResponse<Value>> + Send + Sync>;

#[derive(Clone)]
enum Route {
    Respond(ApiResponse<Value>),
    /// Non-2xx without an envelope.
    Unreachable { status: Option<u16> },
    Handle(Handler),
}

#[derive(Default)]
struct LocalState {
    routes: HashMap<(Method, String), Route>,
    requests: Vec<RecordedRequest>,
    offline: bool,
}

/// In-memory transport.
#[derive(Clone, Default)]
pub struct LocalTransport {
    state: Arc<RwLock<LocalState>>,
}

fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl LocalTransport {
    /// Create an empty transport. Unknown routes fail like a 404 without envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` inside a successful envelope.
    pub fn respond_data(&self, method: Method, path: &str, data: Value) -> &Self {
        self.respond(method, path, ApiResponse::success(data))
    }

    /// Serve a fixed envelope.
    pub fn respond(&self, method: Method, path: &str, envelope: ApiResponse<Value>) -> &Self {
        self.insert(method, path, Route::Respond(envelope))
    }

    /// Fail with a transport error, optionally carrying a status.
    pub fn fail(&self, method: Method, path: &str, status: Option<u16>) -> &Self {
        self.insert(method, path, Route::Unreachable { status })
    }

    /// Compute the envelope per request.
    pub fn handle<F>(&self, method: Method, path: &str, handler: F) -> &Self
    where
        F: Fn(&RecordedRequest) -> DashboardResult<ApiResponse<Value>> + Send + Sync + 'static,
    {
        self.insert(method, path, Route::Handle(Arc::new(handler)))
    }

    fn insert(&self, method: Method, path: &str, route: Route) -> &Self {
        self.state
            .write()
            .routes
            .insert((method, normalize_path(path)), route);
        self
    }

    /// Simulate losing the network: every request fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state.write().offline = offline;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().requests.clone()
    }

    /// Number of requests made to `path` with `method`.
    pub fn hits(&self, method: Method, path: &str) -> usize {
        let path = normalize_path(path);
        self.state
            .read()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.state.write().requests.clear();
    }

    fn dispatch(&self, request: RecordedRequest) -> DashboardResult<ApiResponse<Value>> {
        let context = ErrorContext::new(format!("{} {}", request.method, request.path))
            .with_endpoint(request.path.clone());

        let route = {
            let mut state = self.state.write();
            state.requests.push(request.clone());
            if state.offline {
                log::warn!("{} failed: offline", context);
                return Err(DashboardError::transport_with_context(context));
            }
            state
                .routes
                .get(&(request.method, request.path.clone()))
                .cloned()
        };

        match route {
            Some(Route::Respond(envelope)) => Ok(envelope),
            Some(Route::Handle(handler)) => handler(&request),
            Some(Route::Unreachable { status }) => {
                let context = match status {
                    Some(code) => context.with_status(code),
                    None => context,
                };
                Err(DashboardError::transport_with_context(context))
            }
            None => {
                log::warn!("{} has no local route", context);
                Err(DashboardError::transport_with_context(context.with_status(404)))
            }
        }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> DashboardResult<ApiResponse<Value>> {
        self.dispatch(RecordedRequest {
            method: Method::Get,
            path: normalize_path(path),
            query: query.to_vec(),
            body: None,
        })
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> DashboardResult<ApiResponse<Value>> {
        self.dispatch(RecordedRequest {
            method: Method::Post,
            path: normalize_path(path),
            query: Vec::new(),
            body: body.cloned(),
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fixed_response_and_recording() {
        let transport = LocalTransport::new();
        transport.respond_data(Method::Get, "admin/stock/list", json!([{"id": "i1"}]));

        let query = vec![("date".to_string(), "2026-03-02".to_string())];
        let envelope = transport.get("/admin/stock/list", &query).await.unwrap();
        assert!(envelope.success);
        assert_eq!(transport.hits(Method::Get, "admin/stock/list"), 1);
        assert_eq!(transport.requests()[0].query, query);
    }

    #[tokio::test]
    async fn test_unknown_route_is_transport_error() {
        let err = LocalTransport::new().get("admin/nope", &[]).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.context().status, Some(404));
    }

    #[tokio::test]
    async fn test_handler_sees_body() {
        let transport = LocalTransport::new();
        transport.handle(Method::Post, "admin/stock", |req| {
            Ok(ApiResponse::success(req.body.clone().unwrap_or(Value::Null)))
        });
        let body = json!({"ingredient_id": "i1", "available_quantity": 5.0});
        let envelope = transport.post("admin/stock", Some(&body)).await.unwrap();
        assert_eq!(envelope.data, Some(body));
    }

    #[tokio::test]
    async fn test_offline() {
        let transport = LocalTransport::new();
        transport.respond_data(Method::Get, "admin/menu/today", json!([]));
        transport.set_offline(true);
        assert!(transport.get("admin/menu/today", &[]).await.is_err());
        transport.set_offline(false);
        assert!(transport.get("admin/menu/today", &[]).await.is_ok());
        assert_eq!(transport.hits(Method::Get, "admin/menu/today"), 2);
    }
}
