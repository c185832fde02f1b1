//! Transport trait: the HTTP collaborator boundary.
//!
//! A transport performs one request against the configured backend and hands
//! back the decoded envelope. It does not look inside `data`.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::error::DashboardResult;
use crate::models::ApiResponse;

/// HTTP method of an admin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Query string pairs, in order.
pub type Query = Vec<(String, String)>;

/// Transport for admin endpoints.
///
/// # Errors
/// * `Transport` - network failure, or a non-2xx response with no envelope
/// * `Application` - a non-2xx response that carried an envelope
/// * `Decode` - a 2xx response whose body is not an envelope
///
/// A 2xx envelope with `success: false` is returned as `Ok`; callers decide
/// what to do with it.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one transport can serve
/// concurrent fetches.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET {base}/{path}?{query}`.
    async fn get(&self, path: &str, query: &[(String, String)]) -> DashboardResult<ApiResponse<Value>>;

    /// `POST {base}/{path}` with an optional JSON body.
    async fn post(&self, path: &str, body: Option<&Value>) -> DashboardResult<ApiResponse<Value>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
