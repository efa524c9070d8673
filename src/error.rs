//! Error types for the directory adapter.
//!
//! Every failure surfaced to an MCP caller maps onto one of five wire-level
//! kinds (see [`AdapterError::kind`]). Errors are converted into structured
//! envelopes at the tool-handler boundary; nothing propagates past dispatch.

/// Result type alias used throughout the adapter.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Failures that can occur while translating tool invocations into
/// directory calls.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Request payload missing required fields or carrying malformed values.
    /// Detected before any remote call is issued.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The credential was rejected or token acquisition failed. Surfaced
    /// per-invocation; the operator must rotate or correct the credential.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The target user does not exist in the directory.
    #[error("User not found: {user_id}")]
    NotFound { user_id: String },

    /// A directory-side uniqueness constraint was violated, typically a
    /// create with a duplicate principal name.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Any other failure from the directory service, surfaced with status
    /// detail. The caller decides whether to retry.
    #[error("Directory service error ({status}): {detail}")]
    RemoteService { status: u16, detail: String },

    /// Transport-level failure reaching the directory service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing startup configuration. The only failure allowed
    /// to abort the process, and only before it starts serving.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Socket-level I/O failure while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdapterError {
    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a user-not-found error.
    pub fn not_found(user_id: impl Into<String>) -> Self {
        Self::NotFound {
            user_id: user_id.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a remote-service error with status detail.
    pub fn remote_service(status: u16, detail: impl Into<String>) -> Self {
        Self::RemoteService {
            status,
            detail: detail.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The wire-level error kind surfaced to MCP callers.
    ///
    /// `Config` and `Io` abort startup before the adapter serves; if one
    /// ever reaches a handler it is reported as a remote-service failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "InvalidInputError",
            Self::Authentication { .. } => "AuthenticationError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Conflict { .. } => "ConflictError",
            Self::RemoteService { .. } | Self::Http(_) | Self::Config { .. } | Self::Io(_) => {
                "RemoteServiceError"
            }
        }
    }
}
