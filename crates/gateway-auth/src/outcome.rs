//! Terminal results of a single authentication attempt.

use http::StatusCode;
use serde_json::Value;

use crate::AuthError;

/// What a [`Strategy`](crate::Strategy) reports for one request.
///
/// Exactly one outcome is produced per `authenticate` call.
#[derive(Debug)]
pub enum Outcome<U> {
    /// The request is authenticated as `user`.
    Success {
        /// The application-level user.
        user: U,
        /// Optional extra detail supplied by the verifier.
        info: Option<Value>,
    },
    /// The request was rejected. Expected and recoverable.
    Fail {
        /// Rejection detail (a challenge or `{ "message": ... }` object).
        info: Option<Value>,
        /// HTTP status to respond with, if the strategy chose one.
        status: Option<StatusCode>,
    },
    /// Authentication could not be completed.
    Error(AuthError),
}

impl<U> Outcome<U> {
    /// Successful authentication.
    pub fn success(user: U, info: Option<Value>) -> Self {
        Outcome::Success { user, info }
    }

    /// Rejection with optional detail and status.
    pub fn fail(info: Option<Value>, status: Option<StatusCode>) -> Self {
        Outcome::Fail { info, status }
    }

    /// Rejection carrying a `{ "message": ... }` body.
    pub fn fail_with_message(message: impl Into<String>, status: Option<StatusCode>) -> Self {
        Outcome::Fail {
            info: Some(serde_json::json!({ "message": message.into() })),
            status,
        }
    }

    /// Authentication error.
    pub fn error(err: AuthError) -> Self {
        Outcome::Error(err)
    }

    /// Whether a user was produced.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Whether authentication was rejected.
    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail { .. })
    }

    /// Whether authentication could not be completed.
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Human-readable rejection message, if this is a `Fail` that carries one.
    ///
    /// Accepts either a bare string or an object with a `message` field.
    pub fn fail_message(&self) -> Option<&str> {
        match self {
            Outcome::Fail { info: Some(info), .. } => match info {
                Value::String(s) => Some(s.as_str()),
                other => other.get("message").and_then(Value::as_str),
            },
            _ => None,
        }
    }

    /// Status attached to a `Fail`, if any.
    pub fn fail_status(&self) -> Option<StatusCode> {
        match self {
            Outcome::Fail { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fail_with_message() {
        let outcome: Outcome<()> =
            Outcome::fail_with_message("Missing credentials", Some(StatusCode::BAD_REQUEST));
        assert!(outcome.is_fail());
        assert_eq!(outcome.fail_message(), Some("Missing credentials"));
        assert_eq!(outcome.fail_status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_fail_message_from_string_info() {
        let outcome: Outcome<()> = Outcome::fail(Some(json!("account locked")), None);
        assert_eq!(outcome.fail_message(), Some("account locked"));
        assert_eq!(outcome.fail_status(), None);
    }

    #[test]
    fn test_fail_message_absent() {
        let outcome: Outcome<()> = Outcome::fail(Some(json!({ "code": 7 })), None);
        assert_eq!(outcome.fail_message(), None);

        let outcome: Outcome<()> = Outcome::fail(None, None);
        assert_eq!(outcome.fail_message(), None);
    }

    #[test]
    fn test_success_has_no_fail_message() {
        let outcome = Outcome::success("u1", None);
        assert!(outcome.is_success());
        assert!(!outcome.is_fail());
        assert_eq!(outcome.fail_message(), None);
    }

    #[test]
    fn test_error_outcome() {
        let outcome: Outcome<()> = Outcome::error(AuthError::verification("nope"));
        assert!(outcome.is_error());
        assert_eq!(outcome.fail_status(), None);
    }
}
