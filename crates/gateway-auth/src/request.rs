//! Values attached to a request by upstream gateway-integration middleware.

use std::collections::HashMap;

use http::{Extensions, HeaderMap, Method, Uri};
use serde_json::{Value, json};

/// Named properties an upstream layer stores on a request.
///
/// Gateway integrations typically attach the raw gateway event under a
/// property such as `apiGateway`, shaped as `{ "event": ..., "context": ... }`.
/// The map lives in the request extensions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestProperties {
    values: HashMap<String, Value>,
}

impl RequestProperties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// Store a gateway event and its invocation context under `key`.
    pub fn insert_gateway_event(&mut self, key: impl Into<String>, event: Value, context: Value) {
        self.insert(key, json!({ "event": event, "context": context }));
    }

    /// Raw value of the property `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Resolve a JSON pointer (e.g. `/event/requestContext`) inside the
    /// property `key`. `null` is treated as absent.
    pub fn lookup(&self, key: &str, pointer: &str) -> Option<&Value> {
        self.get(key)?
            .pointer(pointer)
            .filter(|value| !value.is_null())
    }

    /// Properties attached to a request head, if any.
    pub fn from_parts(parts: &http::request::Parts) -> Option<&Self> {
        parts.extensions.get::<RequestProperties>()
    }
}

/// Owned snapshot of a request head, handed to request-aware verifiers.
///
/// Carries every extension earlier layers attached, not only the
/// [`RequestProperties`].
#[derive(Clone, Debug)]
pub struct RequestView {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// All request extensions, as seen when authentication ran.
    pub extensions: Extensions,
    /// Gateway properties, copied out of `extensions` for convenience.
    pub properties: RequestProperties,
}

impl RequestView {
    /// Snapshot a request head.
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            extensions: parts.extensions.clone(),
            properties: RequestProperties::from_parts(parts)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Typed extension attached by an earlier layer.
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}
