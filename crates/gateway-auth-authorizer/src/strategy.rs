//! The authorizer-context strategy.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use futures::FutureExt;
use gateway_auth::{
    AuthError, AuthenticateOptions, BoxFuture, Outcome, RequestProperties, RequestView, Strategy,
};
use http::request::Parts;
use http::StatusCode;

use crate::config::{AuthorizerConfig, ConfigError};
use crate::verify::{AuthorizerContext, Verdict, Verifier, VerifyResult};

/// Rejection message when the request carries no authorizer context.
pub const DEFAULT_BAD_REQUEST_MESSAGE: &str = "Missing credentials";

/// Location of the authorizer object inside the stored gateway property.
const AUTHORIZER_POINTER: &str = "/event/requestContext/authorizer";

/// Authenticates requests from the authorizer context an upstream gateway
/// attached to them.
///
/// The gateway has already verified the caller; this strategy only reads
/// `properties[request_property_key].event.requestContext.authorizer` and
/// hands it to the configured [`Verifier`] to resolve an application user.
#[derive(Debug)]
pub struct AuthorizerStrategy<U> {
    config: AuthorizerConfig,
    verifier: Verifier<U>,
}

impl<U> AuthorizerStrategy<U>
where
    U: Clone + Send + Sync + 'static,
{
    /// Strategy name reported to the pipeline.
    pub const NAME: &'static str = "authorizer";

    /// Create a strategy with the default configuration.
    pub fn new(verifier: Verifier<U>) -> Result<Self, ConfigError> {
        Self::builder().verifier(verifier).build()
    }

    /// Create a strategy with an explicit configuration.
    pub fn with_config(
        config: AuthorizerConfig,
        verifier: Verifier<U>,
    ) -> Result<Self, ConfigError> {
        Self::builder().config(config).verifier(verifier).build()
    }

    /// Start building a strategy from the default configuration.
    pub fn builder() -> AuthorizerStrategyBuilder<U> {
        AuthorizerStrategyBuilder::default()
    }

    /// The configuration this strategy was built with.
    pub fn config(&self) -> &AuthorizerConfig {
        &self.config
    }

    /// The authorizer context attached to a request, if present and not `null`.
    pub fn authorizer_context(&self, parts: &Parts) -> Option<AuthorizerContext> {
        RequestProperties::from_parts(parts)?
            .lookup(self.config.request_property_key(), AUTHORIZER_POINTER)
            .cloned()
    }

    async fn verify(&self, parts: &Parts, authorizer: AuthorizerContext) -> Outcome<U> {
        log::debug!(
            "Invoking verifier for property '{}'",
            self.config.request_property_key()
        );

        let invoked = match &self.verifier {
            Verifier::Authorizer(f) => catch_unwind(AssertUnwindSafe(|| f(authorizer))),
            Verifier::WithRequest(f) => {
                let request = RequestView::from_parts(parts);
                catch_unwind(AssertUnwindSafe(|| f(request, authorizer)))
            }
        };

        let pending = match invoked {
            Ok(pending) => pending,
            Err(payload) => return panicked(&*payload),
        };

        match AssertUnwindSafe(pending).catch_unwind().await {
            Ok(result) => verified(result),
            Err(payload) => panicked(&*payload),
        }
    }
}

impl<U> Strategy for AuthorizerStrategy<U>
where
    U: Clone + Send + Sync + 'static,
{
    type User = U;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn authenticate<'a>(
        &'a self,
        request: &'a Parts,
        options: &'a AuthenticateOptions,
    ) -> BoxFuture<'a, Outcome<U>> {
        Box::pin(async move {
            let Some(authorizer) = self.authorizer_context(request) else {
                log::debug!(
                    "No authorizer context under '{}'",
                    self.config.request_property_key()
                );
                let message = options
                    .bad_request_message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_BAD_REQUEST_MESSAGE);
                return Outcome::fail_with_message(message, Some(StatusCode::BAD_REQUEST));
            };

            self.verify(request, authorizer).await
        })
    }
}

/// Map a completed verifier result onto the outcome channel.
fn verified<U>(result: VerifyResult<U>) -> Outcome<U> {
    match result {
        Err(err) => {
            log::error!("Verifier reported an error: {err}");
            Outcome::error(AuthError::Verification(err))
        }
        Ok(Verdict::Decline { info }) => Outcome::fail(info, None),
        Ok(Verdict::Accept { user, info }) => Outcome::success(user, info),
    }
}

fn panicked<U>(payload: &(dyn Any + Send)) -> Outcome<U> {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    log::error!("Verifier panicked: {message}");
    Outcome::error(AuthError::VerifierPanicked(message))
}

/// Builder for [`AuthorizerStrategy`].
///
/// `build()` fails when no verifier was supplied.
pub struct AuthorizerStrategyBuilder<U> {
    config: AuthorizerConfig,
    verifier: Option<Verifier<U>>,
}

impl<U> Default for AuthorizerStrategyBuilder<U> {
    fn default() -> Self {
        Self {
            config: AuthorizerConfig::default(),
            verifier: None,
        }
    }
}

impl<U> AuthorizerStrategyBuilder<U>
where
    U: Clone + Send + Sync + 'static,
{
    /// Replace the whole configuration.
    pub fn config(mut self, config: AuthorizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Property the gateway event is stored under.
    pub fn request_property_key(mut self, key: impl Into<String>) -> Self {
        self.config.request_property_key = key.into();
        self
    }

    /// Whether the verifier also receives the request.
    pub fn pass_request_to_callback(mut self, pass: bool) -> Self {
        self.config.pass_request_to_callback = pass;
        self
    }

    /// Set the verification function.
    pub fn verifier(mut self, verifier: Verifier<U>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Use an async function of the authorizer context.
    pub fn verify<F, Fut>(self, f: F) -> Self
    where
        F: Fn(AuthorizerContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = VerifyResult<U>> + Send + 'static,
    {
        self.verifier(Verifier::authorizer(f))
    }

    /// Use an async function of the request and the authorizer context.
    /// Also turns on `pass_request_to_callback`.
    pub fn verify_with_request<F, Fut>(self, f: F) -> Self
    where
        F: Fn(RequestView, AuthorizerContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = VerifyResult<U>> + Send + 'static,
    {
        self.pass_request_to_callback(true).verifier(Verifier::with_request(f))
    }

    /// Finish construction, checking the verifier against the configuration.
    pub fn build(self) -> Result<AuthorizerStrategy<U>, ConfigError> {
        let verifier = self.verifier.ok_or(ConfigError::MissingVerifier)?;
        let pass_request = self.config.pass_request_to_callback;
        if verifier.takes_request() != pass_request {
            return Err(ConfigError::VerifierArity { pass_request });
        }
        Ok(AuthorizerStrategy {
            config: self.config,
            verifier,
        })
    }
}
