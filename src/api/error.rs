//! Error types for the notebook backend client.

/// Result type alias using [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the notebook backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: request never completed or response unreadable.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The requested notebook or source does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response with a server-provided error body.
    #[error("Server error ({status}): {detail}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Structured `detail` field when present, raw body text otherwise.
        detail: String,
    },

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a server error.
    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            detail: detail.into(),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Short user-facing message for notification overlays.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::NotFound(what) => format!("Not found: {what}"),
            ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Json(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ApiError::server(500, "boom");
        assert_eq!(err.to_string(), "Server error (500): boom");
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(ApiError::NotFound("notebook 3".into()).is_not_found());
        assert!(!ApiError::server(400, "bad").is_not_found());
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ApiError::server(409, "Source already exists");
        assert_eq!(err.user_message(), "Source already exists");
    }
}
