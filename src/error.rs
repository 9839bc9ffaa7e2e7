//! Error types.
//!
//! `AppError` is what the binary sees: an exit code plus a printable message.
//! Lower layers return typed errors (`FeedError`, `SimError`) and convert
//! into `AppError` at the boundary.

/// Exit code for bad input, configuration, or rejected simulation inputs.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for a feed that cannot be parsed at all.
pub const EXIT_FEED: u8 = 3;
/// Exit code for network, terminal, and other runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Whole-payload failures of the feed parser.
///
/// Per-row problems are not errors; they are reported as `RowOutcome::Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("feed is empty (no header line)")]
    EmptyPayload,

    #[error("feed header mismatch: missing {} (found: {})", .missing.join(", "), .found.join(", "))]
    HeaderMismatch {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to read feed header: {0}")]
    Header(String),
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        AppError::new(EXIT_FEED, err.to_string())
    }
}

/// Failures on the simulation / report / interpretation / chat path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("missing simulation inputs: {}", .0.join(", "))]
    ValidationFailed(Vec<&'static str>),

    #[error("request to {endpoint} failed: {message}")]
    RequestFailed { endpoint: String, message: String },
}

impl From<SimError> for AppError {
    fn from(err: SimError) -> Self {
        let code = match &err {
            SimError::ValidationFailed(_) => EXIT_INPUT,
            SimError::RequestFailed { .. } => EXIT_RUNTIME,
        };
        AppError::new(code, err.to_string())
    }
}
