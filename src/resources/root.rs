//! The API entry point.

use crate::clients::HttpClient;
use crate::config::ApiConfig;
use crate::hal::{EmptyApiData, Link, Resource, ResourceError};
use crate::resources::{AuthoritiesResource, UsersResource};

/// Relation of the users collection on the entry resource.
pub const USERS_REL: &str = "users";

/// Relation of the authorities collection on the entry resource.
pub const AUTHORITIES_REL: &str = "authorities";

/// The entry resource of the user service.
///
/// # Example
///
/// ```rust,ignore
/// use userservice_api::{ApiConfig, HttpClient, ServiceUrl};
/// use userservice_api::resources::ServiceRoot;
///
/// let config = ApiConfig::builder()
///     .base_url(ServiceUrl::new("http://localhost:8080/api")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let mut root = ServiceRoot::from_config(&config)?;
/// let mut authorities = root.authorities(&client).await?;
/// ```
#[derive(Clone, Debug)]
pub struct ServiceRoot {
    resource: Resource<EmptyApiData>,
}

impl ServiceRoot {
    /// Creates the entry resource at `link`.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            resource: Resource::new(link),
        }
    }

    /// Creates the entry resource at the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the base URL cannot be used as a link.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ResourceError> {
        Ok(Self::new(config.base_url().to_link()?))
    }

    /// Returns the entry resource's `self` link.
    #[must_use]
    pub const fn self_link(&self) -> &Link {
        self.resource.self_link()
    }

    /// Follows the `users` relation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the relation is absent,
    /// or any error from loading the entry resource.
    pub async fn users(&mut self, client: &HttpClient) -> Result<UsersResource, ResourceError> {
        let link = self.resource.link_for(client, USERS_REL).await?;
        Ok(UsersResource::new(link))
    }

    /// Follows the `authorities` relation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the relation is absent,
    /// or any error from loading the entry resource.
    pub async fn authorities(
        &mut self,
        client: &HttpClient,
    ) -> Result<AuthoritiesResource, ResourceError> {
        let link = self.resource.link_for(client, AUTHORITIES_REL).await?;
        Ok(AuthoritiesResource::new(link))
    }
}
