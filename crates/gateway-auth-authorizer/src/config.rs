//! Strategy configuration and construction errors.

use serde::{Deserialize, Serialize};

/// Request property the gateway integration stores its event under by default.
pub const DEFAULT_REQUEST_PROPERTY_KEY: &str = "apiGateway";

/// Immutable configuration for an [`AuthorizerStrategy`](crate::AuthorizerStrategy).
///
/// Deserializes from both snake_case and the `reqPropKey` /
/// `passReqToCallback` spelling used by gateway-integration settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// Property holding `{ event, context }` for the gateway invocation.
    #[serde(alias = "reqPropKey")]
    pub request_property_key: String,
    /// Whether the verifier receives the request as well as the authorizer context.
    #[serde(alias = "passReqToCallback")]
    pub pass_request_to_callback: bool,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            request_property_key: DEFAULT_REQUEST_PROPERTY_KEY.to_string(),
            pass_request_to_callback: false,
        }
    }
}

impl AuthorizerConfig {
    /// Parse configuration from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// The property key to read; an empty key means the default.
    pub fn request_property_key(&self) -> &str {
        if self.request_property_key.is_empty() {
            DEFAULT_REQUEST_PROPERTY_KEY
        } else {
            &self.request_property_key
        }
    }
}

/// Errors raised while constructing a strategy.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No verification function was supplied.
    #[error("AuthorizerStrategy requires a verify callback")]
    MissingVerifier,

    /// The verifier's signature disagrees with `pass_request_to_callback`.
    #[error("verifier signature does not match pass_request_to_callback = {pass_request}")]
    VerifierArity { pass_request: bool },

    /// Configuration text could not be parsed.
    #[error("invalid authorizer configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthorizerConfig::default();
        assert_eq!(config.request_property_key(), "apiGateway");
        assert!(!config.pass_request_to_callback);
    }

    #[test]
    fn test_empty_key_falls_back_to_default() {
        let config = AuthorizerConfig {
            request_property_key: String::new(),
            pass_request_to_callback: false,
        };
        assert_eq!(config.request_property_key(), DEFAULT_REQUEST_PROPERTY_KEY);
    }

    #[test]
    fn test_from_toml_snake_case() {
        let config = AuthorizerConfig::from_toml_str(
            r#"
            request_property_key = "lambda"
            pass_request_to_callback = true
            "#,
        )
        .unwrap();
        assert_eq!(config.request_property_key(), "lambda");
        assert!(config.pass_request_to_callback);
    }

    #[test]
    fn test_from_toml_camel_case_aliases() {
        let config = AuthorizerConfig::from_toml_str(
            r#"
            reqPropKey = "gw"
            passReqToCallback = true
            "#,
        )
        .unwrap();
        assert_eq!(config.request_property_key(), "gw");
        assert!(config.pass_request_to_callback);
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = AuthorizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, AuthorizerConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = AuthorizerConfig::from_toml_str("passReqToCallback = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_object() {
        let config: AuthorizerConfig =
            serde_json::from_str(r#"{"reqPropKey": "custom"}"#).unwrap();
        assert_eq!(config.request_property_key(), "custom");
        assert!(!config.pass_request_to_callback);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingVerifier.to_string(),
            "AuthorizerStrategy requires a verify callback"
        );
        assert_eq!(
            ConfigError::VerifierArity { pass_request: true }.to_string(),
            "verifier signature does not match pass_request_to_callback = true"
        );
    }
}
