//! Generic Tower authentication middleware.
//!
//! `AuthLayer` and `AuthService` wrap any inner service with a [`Strategy`].
//! The strategy's [`Outcome`] decides whether the request is forwarded.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{Request, StatusCode};
use tower::{Layer, Service};

use crate::{AuthLayerConfig, Authenticated, Outcome, Strategy};

/// Tower `Layer` that wraps services with strategy authentication.
pub struct AuthLayer<St: Strategy> {
    strategy: Arc<St>,
    config: AuthLayerConfig,
}

impl<St: Strategy> AuthLayer<St> {
    /// Create a new auth layer with the given strategy and config.
    pub fn new(strategy: Arc<St>, config: AuthLayerConfig) -> Self {
        Self { strategy, config }
    }
}

impl<St: Strategy> Clone for AuthLayer<St> {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy.clone(),
            config: self.config.clone(),
        }
    }
}

impl<St: Strategy, S> Layer<S> for AuthLayer<St> {
    type Service = AuthService<St, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            strategy: self.strategy.clone(),
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that authenticates requests before forwarding them.
///
/// On success, inserts [`Authenticated<St::User>`] into request extensions
/// where it's available to downstream handlers.
pub struct AuthService<St: Strategy, S> {
    inner: S,
    strategy: Arc<St>,
    config: AuthLayerConfig,
}

impl<St: Strategy, S: Clone> Clone for AuthService<St, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            strategy: self.strategy.clone(),
            config: self.config.clone(),
        }
    }
}

impl<St, S> Service<Request<Body>> for AuthService<St, S>
where
    St: Strategy,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let strategy = self.strategy.clone();
        let config = self.config.clone();

        Box::pin(async move {
            // Dev mode — no auth required
            if !config.enabled {
                let resp = inner
                    .call(req)
                    .await
                    .unwrap_or_else(|infallible| match infallible {});
                return Ok(resp.into_response());
            }

            let (mut parts, body) = req.into_parts();
            let outcome = strategy.authenticate(&parts, &config.options).await;

            match outcome {
                Outcome::Success { user, info } => {
                    parts.extensions.insert(Authenticated::new(user, info));
                    let req = Request::from_parts(parts, body);
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Outcome::Error(err) => {
                    log::error!("Authentication error ({}): {err}", strategy.name());
                    Ok(err.into_response())
                }
                rejected => {
                    let message = rejected.fail_message().unwrap_or("unauthorized");
                    let status = rejected.fail_status().unwrap_or(StatusCode::UNAUTHORIZED);
                    log::warn!(
                        "Authentication failed ({}): {status} {message}",
                        strategy.name()
                    );
                    Ok(error_response(status, message))
                }
            }
        })
    }
}

/// Build a JSON error response.
pub(crate) fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    let body = serde_json::json!({
        "error": {
            "category": "authentication",
            "message": message,
        }
    });

    (
        status,
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response()
}
