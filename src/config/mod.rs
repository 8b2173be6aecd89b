//! Configuration types for the user service API client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiConfig`]: The configuration struct holding all client settings
//! - [`ApiConfigBuilder`]: A builder for constructing [`ApiConfig`] instances
//! - [`ServiceUrl`]: A validated URL of the API entry resource
//! - [`BasicCredentials`]: HTTP basic auth credentials with masked debug output
//!
//! # Example
//!
//! ```rust
//! use userservice_api::{ApiConfig, ServiceUrl, DataType};
//!
//! let config = ApiConfig::builder()
//!     .base_url(ServiceUrl::new("http://localhost:8080/api").unwrap())
//!     .media_type(DataType::SpringDataVerboseJson)
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{BasicCredentials, ServiceUrl};

use crate::clients::DataType;
use crate::error::ConfigError;

/// Configuration for the user service API client.
///
/// # Thread Safety
///
/// `ApiConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: ServiceUrl,
    media_type: DataType,
    user_agent_prefix: Option<String>,
    credentials: Option<BasicCredentials>,
}

impl ApiConfig {
    /// Creates a new builder for constructing an `ApiConfig`.
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Returns the URL of the API entry resource.
    #[must_use]
    pub const fn base_url(&self) -> &ServiceUrl {
        &self.base_url
    }

    /// Returns the hypermedia media type requested when loading resources.
    #[must_use]
    pub const fn media_type(&self) -> DataType {
        self.media_type
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the basic auth credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&BasicCredentials> {
        self.credentials.as_ref()
    }
}

// Verify ApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiConfig>();
};

/// Builder for constructing [`ApiConfig`] instances.
///
/// The only required field is `base_url`.
///
/// # Defaults
///
/// - `media_type`: [`DataType::HalJson`]
/// - `user_agent_prefix`: `None`
/// - `credentials`: `None`
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<ServiceUrl>,
    media_type: Option<DataType>,
    user_agent_prefix: Option<String>,
    credentials: Option<BasicCredentials>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL of the API entry resource (required).
    #[must_use]
    pub fn base_url(mut self, url: ServiceUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the media type sent in the `Accept` header of resource loads.
    #[must_use]
    pub const fn media_type(mut self, media_type: DataType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets HTTP basic auth credentials sent with every request.
    #[must_use]
    pub fn credentials(mut self, credentials: BasicCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builds the [`ApiConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(ApiConfig {
            base_url,
            media_type: self.media_type.unwrap_or(DataType::HalJson),
            user_agent_prefix: self.user_agent_prefix,
            credentials: self.credentials,
        })
    }
}
