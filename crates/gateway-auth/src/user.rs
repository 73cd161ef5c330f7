//! Authenticated identity and extraction helpers.

use axum::extract::FromRequestParts;
use http::request::Parts;
use serde_json::Value;

use crate::AuthError;

/// The identity produced by a successful [`Outcome`](crate::Outcome).
///
/// Stored in HTTP request extensions by the auth middleware. Handlers take it
/// as an axum extractor; a request without one is rejected with 401.
#[derive(Debug, Clone)]
pub struct Authenticated<U> {
    /// The application-level user returned by the verifier.
    pub user: U,
    /// Extra detail the verifier attached to the success.
    pub info: Option<Value>,
}

impl<U> Authenticated<U> {
    pub fn new(user: U, info: Option<Value>) -> Self {
        Self { user, info }
    }
}

/// Extract the authenticated user from HTTP request `Parts`, if present.
pub fn user_from_parts<U>(parts: &Parts) -> Option<&U>
where
    U: Clone + Send + Sync + 'static,
{
    parts
        .extensions
        .get::<Authenticated<U>>()
        .map(|auth| &auth.user)
}

impl<U, S> FromRequestParts<S> for Authenticated<U>
where
    U: Clone + Send + Sync + 'static,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authenticated<U>>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: String,
    }

    fn parts_with_user() -> Parts {
        let (mut parts, _body) = http::Request::new(()).into_parts();
        parts.extensions.insert(Authenticated::new(
            User {
                id: "u1".to_string(),
            },
            Some(json!({ "scope": "read" })),
        ));
        parts
    }

    fn parts_without_user() -> Parts {
        let (parts, _body) = http::Request::new(()).into_parts();
        parts
    }

    #[test]
    fn test_user_from_parts_present() {
        let parts = parts_with_user();
        let user = user_from_parts::<User>(&parts).unwrap();
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_user_from_parts_absent() {
        let parts = parts_without_user();
        assert!(user_from_parts::<User>(&parts).is_none());
    }

    #[test]
    fn test_user_from_parts_wrong_type() {
        let parts = parts_with_user();
        assert!(user_from_parts::<String>(&parts).is_none());
    }

    #[tokio::test]
    async fn test_extractor_present() {
        let mut parts = parts_with_user();
        let auth = Authenticated::<User>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(auth.user.id, "u1");
        assert_eq!(auth.info.unwrap()["scope"], "read");
    }

    #[tokio::test]
    async fn test_extractor_absent_rejects() {
        let mut parts = parts_without_user();
        let err = Authenticated::<User>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }
}
