//! Auth-specific error types.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

/// Error reported by a caller-supplied verification function.
pub type VerifyError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The verification function reported an error.
    #[error("verification failed: {0}")]
    Verification(#[source] VerifyError),

    /// The verification function panicked while being invoked or polled.
    #[error("verifier panicked: {0}")]
    VerifierPanicked(String),

    /// A handler asked for an authenticated user but none was attached.
    #[error("request is not authenticated")]
    Unauthenticated,
}

impl AuthError {
    /// Wrap any error reported by a verifier.
    pub fn verification(err: impl Into<VerifyError>) -> Self {
        AuthError::Verification(err.into())
    }

    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::Unauthenticated)
    }

    /// HTTP status used when this error terminates a request.
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failures keep their detail in the logs only.
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "internal authentication error".to_string()
        };
        crate::middleware::error_response(status, &message)
    }
}
