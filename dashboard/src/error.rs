//! Error types for dashboard data access.
//!
//! Two hard failure classes reach presentation code: transport failures (no
//! usable envelope) and application failures (`success: false`). Malformed
//! records inside a successful payload are soft [`DataWarning`]s that are
//! logged and repaired, never returned.

use std::fmt;

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Structured context for dashboard errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "get_analytics", "update_stock")
    pub operation: Option<String>,
    /// Endpoint path relative to the base URL
    pub endpoint: Option<String>,
    /// HTTP status code, when one was received
    pub status: Option<u16>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.endpoint.is_none()
            && self.status.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref endpoint) = self.endpoint {
            parts.push(format!("endpoint={}", endpoint));
        }
        if let Some(status) = self.status {
            parts.push(format!("status={}", status));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Message used when the backend reports failure without saying why.
pub const DEFAULT_APPLICATION_MESSAGE: &str = "Request failed";

/// Message used for every transport-level failure.
pub const DEFAULT_TRANSPORT_MESSAGE: &str = "Unable to reach the meal service";

/// Error type for dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Network failure, or a non-2xx response without a usable envelope.
    #[error("Transport error: {message} {context}")]
    Transport {
        message: String,
        context: ErrorContext,
    },

    /// Envelope present but `success` was false (or `data` was null).
    #[error("Application error: {message} {context}")]
    Application {
        message: String,
        context: ErrorContext,
    },

    /// Envelope `data` did not have the shape the endpoint promises.
    #[error("Decode error: {message} {context}")]
    Decode {
        message: String,
        context: ErrorContext,
    },

    /// Missing or invalid client configuration.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// The token store could not be read or written.
    #[error("Token store error: {message} {context}")]
    TokenStore {
        message: String,
        context: ErrorContext,
    },
}

impl DashboardError {
    /// Create a transport error with the generic message.
    pub fn transport() -> Self {
        Self::Transport {
            message: DEFAULT_TRANSPORT_MESSAGE.to_string(),
            context: ErrorContext::default(),
        }
    }

    /// Create a transport error with context.
    pub fn transport_with_context(context: ErrorContext) -> Self {
        Self::Transport {
            message: DEFAULT_TRANSPORT_MESSAGE.to_string(),
            context,
        }
    }

    /// Create an application error; a missing or blank message falls back to the default.
    pub fn application(message: Option<&str>) -> Self {
        Self::application_with_context(message, ErrorContext::default())
    }

    /// Create an application error with context.
    pub fn application_with_context(message: Option<&str>, context: ErrorContext) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_APPLICATION_MESSAGE)
            .to_string();
        Self::Application { message, context }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a token store error.
    pub fn token_store(message: impl Into<String>) -> Self {
        Self::TokenStore {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Whether a page-level retry affordance makes sense for this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The human-readable message without context.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. }
            | Self::Application { message, .. }
            | Self::Decode { message, .. }
            | Self::Configuration { message, .. }
            | Self::TokenStore { message, .. } => message,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Transport { context, .. }
            | Self::Application { context, .. }
            | Self::Decode { context, .. }
            | Self::Configuration { context, .. }
            | Self::TokenStore { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::Transport { context, .. }
            | Self::Application { context, .. }
            | Self::Decode { context, .. }
            | Self::Configuration { context, .. }
            | Self::TokenStore { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }

    /// Add or update the endpoint in the error context.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        match &mut self {
            Self::Transport { context, .. }
            | Self::Application { context, .. }
            | Self::Decode { context, .. }
            | Self::Configuration { context, .. }
            | Self::TokenStore { context, .. } => {
                context.endpoint = Some(endpoint.into());
            }
        }
        self
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::decode(err.to_string())
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        DashboardError::configuration(format!("Failed to parse config file: {}", err))
    }
}

/// A record that was repaired with a documented fallback.
///
/// These are logged, never returned: a dashboard with one bad row must still render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
    /// Quantity could not be read as a non-negative integer; counted as 1.
    BadQuantity { record: usize, raw: String },
    /// Start time had no `H:MM` component; grouped at `00:00`.
    UnparsableTime { record: usize, raw: String },
    /// No student id could be resolved; tracked under the shared sentinel.
    MissingId { record: usize },
    /// A record did not match the expected shape and was skipped or defaulted.
    MalformedRecord { record: usize, reason: String },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadQuantity { record, raw } => {
                write!(f, "record {}: unreadable quantity {:?}, using 1", record, raw)
            }
            Self::UnparsableTime { record, raw } => {
                write!(f, "record {}: unparsable start time {:?}, using 00:00", record, raw)
            }
            Self::MissingId { record } => {
                write!(f, "record {}: no student id, grouping under sentinel", record)
            }
            Self::MalformedRecord { record, reason } => {
                write!(f, "record {}: malformed ({})", record, reason)
            }
        }
    }
}

impl DataWarning {
    /// Log this warning through the `log` facade.
    pub fn emit(&self, source: &str) {
        log::warn!("{}: {}", source, self);
    }
}
