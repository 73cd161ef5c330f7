//! Pluggable authentication primitives.
//!
//! Provides:
//! - [`Strategy`] — Trait for per-request authentication (implement per mechanism)
//! - [`Outcome`] — The three terminal results a strategy reports
//! - [`AuthLayer`] / [`AuthService`] — Tower middleware that drives a `Strategy`
//! - [`Authenticated`] — Identity stored in request extensions on success
//! - [`RequestProperties`] / [`RequestView`] — Values upstream middleware attached to a request
//! - [`AuthError`] — Auth-specific error types

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

mod error;
mod middleware;
mod outcome;
mod request;
mod user;

pub use error::{AuthError, VerifyError};
pub use middleware::{AuthLayer, AuthService};
pub use outcome::Outcome;
pub use request::{RequestProperties, RequestView};
pub use user::{Authenticated, user_from_parts};

/// Boxed, `Send` future returned by strategies and verifiers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-call settings passed to [`Strategy::authenticate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthenticateOptions {
    /// Rejection message used when the request carries no credentials at all.
    #[serde(alias = "badRequestMessage")]
    pub bad_request_message: Option<String>,
}

impl AuthenticateOptions {
    /// Set the message reported when credentials are missing.
    pub fn with_bad_request_message(mut self, message: impl Into<String>) -> Self {
        self.bad_request_message = Some(message.into());
        self
    }
}

/// Configuration for the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthLayerConfig {
    /// Whether authentication is enabled. When false, all requests pass through.
    pub enabled: bool,
    /// Options forwarded to the strategy on every request.
    pub options: AuthenticateOptions,
}

impl Default for AuthLayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            options: AuthenticateOptions::default(),
        }
    }
}

/// An authentication mechanism the pipeline invokes once per request.
///
/// Implementations read whatever they need from the request head and resolve
/// to exactly one [`Outcome`]. A strategy holds no per-request state, so a
/// single instance is shared by every request.
pub trait Strategy: Send + Sync + 'static {
    /// The application-level user produced on success.
    type User: Clone + Send + Sync + 'static;

    /// Short name of the strategy, used in logs.
    fn name(&self) -> &str;

    /// Authenticate a request.
    fn authenticate<'a>(
        &'a self,
        request: &'a http::request::Parts,
        options: &'a AuthenticateOptions,
    ) -> BoxFuture<'a, Outcome<Self::User>>;
}
