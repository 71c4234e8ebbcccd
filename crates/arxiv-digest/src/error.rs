//! Error types for the arXiv digest view layer.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

/// Errors from the fetch gateway.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// No credential in the store; the login prompt was shown and nothing was sent.
    #[error("Not logged in")]
    Unauthenticated,

    /// The request reached the server and came back non-2xx.
    #[error("HTTP error ({status}): {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// `detail` from the body, the raw body, or the status reason
        message: String,
    },

    /// The request did not reach the server (connection, DNS, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx body that does not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be joined with a request path.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GatewayError {
    /// Create an HTTP error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    /// Status code if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure happened before any byte reached the server.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

/// Errors surfaced by UI handlers.
#[derive(thiserror::Error, Debug)]
pub enum ViewError {
    /// Error from the gateway
    #[error("API error: {0}")]
    Gateway(#[from] GatewayError),

    /// Client-side input validation failed; no request was made
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The checkout redirect collaborator refused the session
    #[error("Checkout failed: {0}")]
    Checkout(String),
}

impl ViewError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Convert to the inline message shown next to the control that failed.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Gateway(GatewayError::Unauthenticated) => {
                "Please log in to continue.".to_string()
            }
            Self::Gateway(GatewayError::Network(_)) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Gateway(GatewayError::Http { status: 401 | 403, .. }) => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::Gateway(GatewayError::Http { status, message }) => {
                format!("Request failed ({status}): {message}")
            }
            Self::Gateway(err) => format!("Unexpected response from the server: {err}"),
            Self::Validation { message, .. } => message.clone(),
            Self::Checkout(message) => format!("Checkout failed: {message}"),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for UI handlers.
pub type ViewResult<T> = Result<T, ViewError>;
