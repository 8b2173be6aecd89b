//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type for accessing the status,
//! headers and raw body of an API response.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

/// An HTTP response from the API.
///
/// The body is kept as received so that deserialization into the caller's
/// payload type happens exactly once, at the resource layer.
///
/// # Example
///
/// ```rust
/// use userservice_api::HttpResponse;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-request-id".to_string(), vec!["req-1".to_string()]);
///
/// let response = HttpResponse::new(200, headers, r#"{"username":"alice"}"#.to_string());
/// assert!(response.is_ok());
/// assert_eq!(response.request_id(), Some("req-1"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the response carries no body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Returns the first value of the given header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the body is not a valid `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Extracts a human readable error message from an error body.
    ///
    /// Spring error bodies carry `message` and `error` fields; anything else
    /// is returned verbatim.
    #[must_use]
    pub fn error_message(&self) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(&self.body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|body| body.get(name))
                .and_then(serde_json::Value::as_str)
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        match (field("error"), field("message")) {
            (Some(error), Some(message)) => format!("{error}: {message}"),
            (Some(text), None) | (None, Some(text)) => text,
            (None, None) if self.is_empty() => "empty response body".to_string(),
            (None, None) => self.body.trim().to_string(),
        }
    }
}
