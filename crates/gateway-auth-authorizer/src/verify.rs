//! Caller-supplied verification functions and their results.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use gateway_auth::{BoxFuture, RequestView, VerifyError};
use serde_json::Value;

/// Opaque authorizer object placed on the request by the upstream gateway.
pub type AuthorizerContext = Value;

/// What a verifier resolves to: a verdict, or an error.
pub type VerifyResult<U> = Result<Verdict<U>, VerifyError>;

/// Decision reached by a verifier that completed without error.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<U> {
    /// The authorizer context maps to `user`.
    Accept { user: U, info: Option<Value> },
    /// No user for this context; `info` is passed on as rejection detail.
    Decline { info: Option<Value> },
}

impl<U> Verdict<U> {
    /// Accept with no extra info.
    pub fn accept(user: U) -> Self {
        Verdict::Accept { user, info: None }
    }

    /// Accept, passing `info` on to the authenticated identity.
    pub fn accept_with_info(user: U, info: Value) -> Self {
        Verdict::Accept {
            user,
            info: Some(info),
        }
    }

    /// Decline with no detail.
    pub fn decline() -> Self {
        Verdict::Decline { info: None }
    }

    /// Decline, passing `info` on as the rejection detail.
    pub fn decline_with_info(info: Value) -> Self {
        Verdict::Decline { info: Some(info) }
    }

    /// Accept when a lookup found a user, decline otherwise.
    pub fn from_user(user: Option<U>) -> Self {
        match user {
            Some(user) => Verdict::accept(user),
            None => Verdict::decline(),
        }
    }
}

type AuthorizerFn<U> =
    dyn Fn(AuthorizerContext) -> BoxFuture<'static, VerifyResult<U>> + Send + Sync;
type RequestFn<U> =
    dyn Fn(RequestView, AuthorizerContext) -> BoxFuture<'static, VerifyResult<U>> + Send + Sync;

/// A verification function, in one of its two accepted shapes.
pub enum Verifier<U> {
    /// Receives only the authorizer context.
    Authorizer(Arc<AuthorizerFn<U>>),
    /// Receives the request as well as the authorizer context.
    WithRequest(Arc<RequestFn<U>>),
}

impl<U: 'static> Verifier<U> {
    /// Wrap an async function of the authorizer context.
    ///
    /// ```
    /// use gateway_auth_authorizer::{Verdict, Verifier};
    ///
    /// let verifier: Verifier<String> = Verifier::authorizer(|authorizer| async move {
    ///     let id = authorizer["principalId"].as_str().map(str::to_string);
    ///     Ok(Verdict::from_user(id))
    /// });
    /// assert!(!verifier.takes_request());
    /// ```
    pub fn authorizer<F, Fut>(f: F) -> Self
    where
        F: Fn(AuthorizerContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = VerifyResult<U>> + Send + 'static,
    {
        Verifier::Authorizer(Arc::new(
            move |authorizer: AuthorizerContext| -> BoxFuture<'static, VerifyResult<U>> {
                Box::pin(f(authorizer))
            },
        ))
    }

    /// Wrap an async function of the request and the authorizer context.
    pub fn with_request<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestView, AuthorizerContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = VerifyResult<U>> + Send + 'static,
    {
        Verifier::WithRequest(Arc::new(
            move |request: RequestView,
                  authorizer: AuthorizerContext|
                  -> BoxFuture<'static, VerifyResult<U>> {
                Box::pin(f(request, authorizer))
            },
        ))
    }

    /// Whether this verifier is called with the request.
    pub fn takes_request(&self) -> bool {
        matches!(self, Verifier::WithRequest(_))
    }
}

impl<U> Clone for Verifier<U> {
    fn clone(&self) -> Self {
        match self {
            Verifier::Authorizer(f) => Verifier::Authorizer(f.clone()),
            Verifier::WithRequest(f) => Verifier::WithRequest(f.clone()),
        }
    }
}

impl<U> fmt::Debug for Verifier<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verifier::Authorizer(_) => f.write_str("Verifier::Authorizer(..)"),
            Verifier::WithRequest(_) => f.write_str("Verifier::WithRequest(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_from_user() {
        assert_eq!(Verdict::from_user(Some(1)), Verdict::accept(1));
        assert_eq!(Verdict::<i32>::from_user(None), Verdict::decline());
    }

    #[test]
    fn test_verdict_with_info() {
        let accepted = Verdict::accept_with_info("u1", json!({ "scope": "admin" }));
        assert!(matches!(accepted, Verdict::Accept { info: Some(_), .. }));

        let declined = Verdict::<()>::decline_with_info(json!("unknown principal"));
        assert_eq!(
            declined,
            Verdict::Decline {
                info: Some(json!("unknown principal"))
            }
        );
    }

    #[tokio::test]
    async fn test_authorizer_verifier_invokes_closure() {
        let verifier: Verifier<String> = Verifier::authorizer(|authorizer| async move {
            Ok(Verdict::accept(
                authorizer["principalId"].as_str().unwrap_or_default().to_string(),
            ))
        });
        assert!(!verifier.takes_request());

        let Verifier::Authorizer(f) = verifier else {
            panic!("expected authorizer verifier");
        };
        let verdict = f(json!({ "principalId": "u1" })).await.unwrap();
        assert_eq!(verdict, Verdict::accept("u1".to_string()));
    }

    #[tokio::test]
    async fn test_request_verifier_receives_request() {
        let verifier: Verifier<String> = Verifier::with_request(|request, _authorizer| async move {
            Ok(Verdict::accept(request.uri.path().to_string()))
        });
        assert!(verifier.takes_request());

        let (parts, _body) = http::Request::builder()
            .uri("/me")
            .body(())
            .unwrap()
            .into_parts();
        let Verifier::WithRequest(f) = verifier.clone() else {
            panic!("expected request verifier");
        };
        let verdict = f(RequestView::from_parts(&parts), json!({})).await.unwrap();
        assert_eq!(verdict, Verdict::accept("/me".to_string()));
    }

    #[test]
    fn test_verifier_debug() {
        let verifier: Verifier<()> = Verifier::authorizer(|_| async { Ok(Verdict::decline()) });
        assert_eq!(format!("{verifier:?}"), "Verifier::Authorizer(..)");
    }
}
