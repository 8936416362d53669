//! Error types for the RecordPilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator has its own error enum; [`Error`] wraps them all and
//! knows which category a failure is reported under.

use thiserror::Error;

/// The top-level error type for all RecordPilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Reasoning capability errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Remote store errors ---
    #[error("{0}")]
    Platform(#[from] PlatformError),

    // --- Tool dispatch errors ---
    #[error("{0}")]
    Tool(#[from] ToolError),

    // --- Planner output errors ---
    #[error("{0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// The category name a failure is reported under.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Provider(_) => "ReasoningError",
            Self::Platform(_) => "RemoteError",
            Self::Tool(ToolError::Parse { .. }) => "ParseError",
            Self::Tool(ToolError::Validation { .. }) => "ValidationError",
            Self::Tool(ToolError::Remote(_)) => "RemoteError",
            Self::Protocol(_) => "PlannerProtocolError",
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures talking to a remote record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The store answered with a status other than the one the operation requires.
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid instance address '{0}'")]
    InvalidInstance(String),

    #[error("Platform not configured: {0}")]
    NotConfigured(String),
}

impl PlatformError {
    /// Whether an idempotent request that failed this way may be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Decode(_) | Self::InvalidInstance(_) | Self::NotConfigured(_) => false,
        }
    }
}

/// Failures of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The raw argument does not match the tool's grammar or carries bad JSON.
    #[error("{tool}: {reason}")]
    Parse { tool: String, reason: String },

    /// The argument parsed but violates a precondition (e.g. empty table).
    #[error("{tool}: {reason}")]
    Validation { tool: String, reason: String },

    #[error("{0}")]
    Remote(#[from] PlatformError),
}

/// The reasoning capability's reply matched neither allowed shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("reply is neither a clarifying question nor a tool invocation: {0}")]
    Unparseable(String),

    #[error("reply contains both a clarifying question and a tool invocation")]
    Conflicting,

    #[error("reply names an unknown tool: {0}")]
    UnknownTool(String),

    #[error("reply has an empty {0}")]
    Empty(&'static str),

    #[error("analysis is missing the '{0}' section")]
    MissingSection(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
        assert_eq!(err.category(), "ReasoningError");
    }

    #[test]
    fn tool_errors_map_to_categories() {
        let parse = Error::from(ToolError::Parse {
            tool: "update_record".into(),
            reason: "Input must be in format 'table_name|sys_id|json_data'".into(),
        });
        assert_eq!(parse.category(), "ParseError");
        assert!(parse.to_string().contains("table_name|sys_id|json_data"));

        let validation = Error::from(ToolError::Validation {
            tool: "table_query".into(),
            reason: "table name is empty".into(),
        });
        assert_eq!(validation.category(), "ValidationError");

        let remote = Error::from(ToolError::Remote(PlatformError::Status {
            status: 403,
            body: "ACL".into(),
        }));
        assert_eq!(remote.category(), "RemoteError");
        assert_eq!(remote.to_string(), "403 - ACL");
    }

    #[test]
    fn protocol_error_category() {
        let err = Error::from(ProtocolError::Conflicting);
        assert_eq!(err.category(), "PlannerProtocolError");
    }

    #[test]
    fn transient_platform_errors() {
        assert!(PlatformError::Transport("reset".into()).is_transient());
        assert!(PlatformError::Status { status: 503, body: String::new() }.is_transient());
        assert!(PlatformError::Status { status: 429, body: String::new() }.is_transient());
        assert!(!PlatformError::Status { status: 404, body: String::new() }.is_transient());
        assert!(!PlatformError::Decode("bad".into()).is_transient());
    }
}
