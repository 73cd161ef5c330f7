//! Gateway authorizer authentication for `gateway-auth`.
//!
//! Implements [`gateway_auth::Strategy`] for requests that an upstream API
//! gateway has already authenticated. The gateway integration stores the
//! invocation event on the request; this crate reads the authorizer context
//! from it and maps it to an application user with a caller-supplied
//! [`Verifier`].
//!
//! No tokens are parsed or verified here.
//!
//! ```
//! use gateway_auth_authorizer::{AuthorizerStrategy, Verdict, Verifier};
//!
//! #[derive(Clone)]
//! struct User {
//!     id: String,
//! }
//!
//! let strategy = AuthorizerStrategy::new(Verifier::authorizer(|authorizer| async move {
//!     let id = authorizer["principalId"].as_str().map(str::to_string);
//!     Ok(Verdict::from_user(id.map(|id| User { id })))
//! }))
//! .unwrap();
//! assert_eq!(strategy.config().request_property_key(), "apiGateway");
//! ```

mod config;
mod strategy;
mod verify;

pub use config::{AuthorizerConfig, ConfigError, DEFAULT_REQUEST_PROPERTY_KEY};
pub use strategy::{AuthorizerStrategy, AuthorizerStrategyBuilder, DEFAULT_BAD_REQUEST_MESSAGE};
pub use verify::{AuthorizerContext, Verdict, Verifier, VerifyResult};
