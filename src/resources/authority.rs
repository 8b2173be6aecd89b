//! Authorities (granted roles) and their collection.

use serde::{Deserialize, Serialize};

use crate::clients::HttpClient;
use crate::hal::{ApiData, Link, Links, PageMetadata, PagedResource, PagedResourceType, ResourceError};

/// A role that can be granted to users, such as `ROLE_ADMIN`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityApiData {
    /// The authority name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    /// A human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "_links", alias = "links", default, skip_serializing)]
    links: Links,
}

impl AuthorityApiData {
    /// Creates authority data from a name and description.
    #[must_use]
    pub fn new(authority: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            authority: Some(authority.into()),
            description: Some(description.into()),
            links: Links::default(),
        }
    }
}

impl ApiData for AuthorityApiData {
    const KIND: &'static str = "Authority";

    fn links(&self) -> &Links {
        &self.links
    }
}

/// The paged collection of all authorities.
#[derive(Clone, Debug)]
pub struct AuthoritiesResource {
    paged: PagedResource<AuthorityApiData>,
}

impl AuthoritiesResource {
    /// Creates an unloaded authorities collection for `link`.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            paged: PagedResource::new(link),
        }
    }

    /// Returns the authorities on this page.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`](crate::hal::Resource::response).
    pub async fn content(
        &mut self,
        client: &HttpClient,
    ) -> Result<&[AuthorityApiData], ResourceError> {
        self.paged.content(client).await
    }

    /// Returns the page metadata, if the server sent any.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`](crate::hal::Resource::response).
    pub async fn page_metadata(
        &mut self,
        client: &HttpClient,
    ) -> Result<Option<PageMetadata>, ResourceError> {
        self.paged.page_metadata(client).await
    }

    /// Creates a new authority.
    ///
    /// # Errors
    ///
    /// See [`Resource::create`](crate::hal::Resource::create).
    pub async fn create(
        &self,
        client: &HttpClient,
        authority: &AuthorityApiData,
    ) -> Result<Option<AuthorityApiData>, ResourceError> {
        self.paged.create(client, authority).await
    }

    /// Writes `authority` to its `self` link.
    ///
    /// # Errors
    ///
    /// See [`Resource::update`](crate::hal::Resource::update).
    pub async fn update(
        &self,
        client: &HttpClient,
        authority: &AuthorityApiData,
    ) -> Result<(), ResourceError> {
        self.paged.update(client, authority).await
    }

    /// Deletes `authority` at its `self` link.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`](crate::hal::Resource::delete).
    pub async fn delete(
        &self,
        client: &HttpClient,
        authority: &AuthorityApiData,
    ) -> Result<(), ResourceError> {
        self.paged.delete(client, authority).await
    }
}

impl PagedResourceType for AuthoritiesResource {
    type Item = AuthorityApiData;

    fn paged(&self) -> &PagedResource<AuthorityApiData> {
        &self.paged
    }

    fn paged_mut(&mut self) -> &mut PagedResource<AuthorityApiData> {
        &mut self.paged
    }

    fn create_resource_instance(templated_base_link: Link, self_link: Link) -> Self {
        Self {
            paged: PagedResource::with_base(templated_base_link, self_link),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authority_round_trip_drops_links() {
        let authority: AuthorityApiData = serde_json::from_value(json!({
            "authority": "ROLE_ADMIN",
            "description": "Administrator",
            "_links": {"self": {"href": "http://host/authorities/1"}}
        }))
        .unwrap();

        assert_eq!(authority.self_link().unwrap().href(), "http://host/authorities/1");
        assert_eq!(
            serde_json::to_value(&authority).unwrap(),
            json!({"authority": "ROLE_ADMIN", "description": "Administrator"})
        );
    }

    #[test]
    fn test_new_authority_has_no_links() {
        let authority = AuthorityApiData::new("ROLE_USER", "Regular user");
        assert!(authority.links().is_empty());
        assert_eq!(authority.authority.as_deref(), Some("ROLE_USER"));
    }
}
