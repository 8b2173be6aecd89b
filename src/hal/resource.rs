//! Lazily loaded hypermedia resources.
//!
//! A [`Resource<T>`] is an immutable address (its `self` link and the
//! templated base link it was derived from) plus a write-once cache of the
//! representation found there. The first [`read`](Resource::read) issues a
//! GET against the expanded `self` link and stores the typed payload; every
//! later read answers from the cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use userservice_api::hal::{EmptyApiData, Link, Resource};
//!
//! let link = Link::new("self", "http://localhost:8080/api")?;
//! let mut root: Resource<EmptyApiData> = Resource::new(link);
//!
//! // One GET, then cached
//! let users = root.link_for(&client, "users").await?;
//! let search = root.link_for(&client, "search").await;
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::clients::HttpClient;
use crate::hal::{ApiData, Link, ResourceError, ResourceResponse, PROJECTION_PARAM, SELF_REL};

/// Details of the last failed load attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    message: String,
    status: Option<u16>,
}

impl LoadFailure {
    fn from_error(error: &ResourceError) -> Self {
        Self {
            message: error.to_string(),
            status: error.status(),
        }
    }

    /// Returns the error message of the failed attempt.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A view of the cache state of a resource.
///
/// The only transitions are `Unloaded -> Loaded`, `Unloaded -> Failed`,
/// `Failed -> Failed` and `Failed -> Loaded`. A loaded resource never
/// changes again.
#[derive(Debug, PartialEq)]
pub enum LoadState<'a, T> {
    /// No load has been attempted.
    Unloaded,
    /// The representation has been fetched and cached.
    Loaded(&'a ResourceResponse<T>),
    /// The last load attempt failed; the next read retries.
    Failed(&'a LoadFailure),
}

impl<T> LoadState<'_, T> {
    /// Returns `true` if the representation is cached.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// A lazily loaded resource with payload type `T`.
#[derive(Clone, Debug)]
pub struct Resource<T> {
    templated_base_link: Link,
    self_link: Link,
    cache: Option<ResourceResponse<T>>,
    failure: Option<LoadFailure>,
}

impl<T> Resource<T> {
    /// Creates a resource whose base and `self` link are the same.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self::with_base(link.clone(), link)
    }

    /// Creates a resource from a templated base link and a distinct `self` link.
    #[must_use]
    pub const fn with_base(templated_base_link: Link, self_link: Link) -> Self {
        Self {
            templated_base_link,
            self_link,
            cache: None,
            failure: None,
        }
    }

    /// Creates a resource from links that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConstruction`] naming the missing link.
    pub fn from_links(
        templated_base_link: Option<Link>,
        self_link: Option<Link>,
    ) -> Result<Self, ResourceError> {
        let self_link = self_link.ok_or(ResourceError::InvalidConstruction { missing: "self" })?;
        let templated_base_link = templated_base_link.ok_or(ResourceError::InvalidConstruction {
            missing: "templated base",
        })?;
        Ok(Self::with_base(templated_base_link, self_link))
    }

    /// Creates an already loaded resource from a payload obtained elsewhere,
    /// such as an entity listed on a page.
    #[must_use]
    pub fn preloaded(link: Link, data: T) -> Self {
        Self::preloaded_with_base(link.clone(), link, data)
    }

    /// Like [`Resource::preloaded`], with a templated base link distinct
    /// from the `self` link.
    #[must_use]
    pub fn preloaded_with_base(templated_base_link: Link, self_link: Link, data: T) -> Self {
        Self {
            templated_base_link,
            self_link,
            cache: Some(ResourceResponse::preloaded(data)),
            failure: None,
        }
    }

    /// Returns the `self` link.
    #[must_use]
    pub const fn self_link(&self) -> &Link {
        &self.self_link
    }

    /// Returns the templated base link.
    #[must_use]
    pub const fn templated_base_link(&self) -> &Link {
        &self.templated_base_link
    }

    /// Returns the cache state.
    #[must_use]
    pub const fn state(&self) -> LoadState<'_, T> {
        match (&self.cache, &self.failure) {
            (Some(response), _) => LoadState::Loaded(response),
            (None, Some(failure)) => LoadState::Failed(failure),
            (None, None) => LoadState::Unloaded,
        }
    }

    /// Returns `true` if the representation is cached.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the URL a load is sent to: the `self` link with every
    /// template expression removed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn target_url(&self) -> Result<String, ResourceError> {
        Ok(self.self_link.expand()?.href().to_string())
    }

    /// Expands `target` with the given `projection` query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn projection_link(target: &Link, projection: &str) -> Result<Link, ResourceError> {
        let mut params = HashMap::new();
        params.insert(PROJECTION_PARAM.to_string(), projection.to_string());
        Ok(target.expand_map(&params)?)
    }

    /// Returns the templated base link expanded with a projection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn projection(&self, projection: &str) -> Result<Link, ResourceError> {
        Self::projection_link(&self.templated_base_link, projection)
    }
}

impl<T: ApiData> Resource<T> {
    /// Creates a resource from the payload's own `self` link, already
    /// loaded with that payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConstruction`] if the payload has no `self` link.
    pub fn from_payload(data: T) -> Result<Self, ResourceError> {
        let link = data
            .self_link()
            .cloned()
            .ok_or(ResourceError::InvalidConstruction { missing: "self" })?;
        Ok(Self::preloaded(link, data))
    }

    /// Returns the cached response, loading it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for transport failures and non-2xx
    /// responses and [`ResourceError::Deserialization`] if the body is not a
    /// valid `T`. A failed load leaves nothing cached.
    pub async fn response(
        &mut self,
        client: &HttpClient,
    ) -> Result<&ResourceResponse<T>, ResourceError> {
        match self.cache {
            Some(ref response) => {
                tracing::trace!(kind = T::KIND, link = %self.self_link, "resource cache hit");
                Ok(response)
            }
            None => match self.fetch(client).await {
                Ok(response) => {
                    self.failure = None;
                    Ok(&*self.cache.insert(response))
                }
                Err(error) => {
                    self.failure = Some(LoadFailure::from_error(&error));
                    Err(error)
                }
            },
        }
    }

    /// Returns the cached payload, loading it first if necessary.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn read(&mut self, client: &HttpClient) -> Result<&T, ResourceError> {
        Ok(self.response(client).await?.data())
    }

    /// Returns the link with relation `rel` from the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the payload has no
    /// such relation, or any error from [`Resource::response`].
    pub async fn link_for(&mut self, client: &HttpClient, rel: &str) -> Result<Link, ResourceError> {
        let found = self.read(client).await?.link(rel).cloned();
        found.ok_or_else(|| ResourceError::MalformedResponse {
            rel: rel.to_string(),
            link: self.self_link.to_string(),
        })
    }

    /// Returns `true` if the payload has a link with relation `rel`.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn has_link(&mut self, client: &HttpClient, rel: &str) -> Result<bool, ResourceError> {
        Ok(self.read(client).await?.links().contains(rel))
    }

    async fn fetch(&self, client: &HttpClient) -> Result<ResourceResponse<T>, ResourceError> {
        let url = self.target_url()?;
        tracing::debug!(kind = T::KIND, url = %url, "loading resource");
        let response = client.get(&url).await?;
        ResourceResponse::from_http_response(&response, &url)
    }
}

impl<T: ApiData + Serialize> Resource<T> {
    /// POSTs `entity` to this resource's `self` link. The cache is untouched.
    ///
    /// Returns the created representation when the server sends one back.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Serialization`], [`ResourceError::Http`] or
    /// [`ResourceError::Deserialization`].
    pub async fn create(&self, client: &HttpClient, entity: &T) -> Result<Option<T>, ResourceError> {
        create_entity(client, &self.self_link, entity).await
    }

    /// PUTs `entity` to the entity's own `self` link. The cache is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the entity has no
    /// `self` link, or [`ResourceError::Serialization`] / [`ResourceError::Http`].
    pub async fn update(&self, client: &HttpClient, entity: &T) -> Result<(), ResourceError> {
        update_entity(client, &self.self_link, entity).await
    }

    /// DELETEs the entity at its own `self` link. The cache is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the entity has no
    /// `self` link, or [`ResourceError::Http`].
    pub async fn delete(&self, client: &HttpClient, entity: &T) -> Result<(), ResourceError> {
        delete_entity(client, &self.self_link, entity).await
    }
}

fn entity_self_url<E: ApiData>(origin: &Link, entity: &E) -> Result<String, ResourceError> {
    let link = entity
        .self_link()
        .ok_or_else(|| ResourceError::MalformedResponse {
            rel: SELF_REL.to_string(),
            link: origin.to_string(),
        })?;
    Ok(link.expand()?.href().to_string())
}

fn to_body<E: ApiData + Serialize>(entity: &E) -> Result<serde_json::Value, ResourceError> {
    serde_json::to_value(entity).map_err(|source| ResourceError::Serialization {
        resource: E::KIND,
        source,
    })
}

pub(crate) async fn create_entity<E: ApiData + Serialize>(
    client: &HttpClient,
    target: &Link,
    entity: &E,
) -> Result<Option<E>, ResourceError> {
    let url = target.expand()?.href().to_string();
    let body = to_body(entity)?;

    tracing::debug!(kind = E::KIND, url = %url, "creating entity");
    let response = client.post(&url, body).await?;

    if response.is_empty() {
        return Ok(None);
    }
    let created = ResourceResponse::<E>::from_http_response(&response, &url)?;
    Ok(Some(created.into_inner()))
}

pub(crate) async fn update_entity<E: ApiData + Serialize>(
    client: &HttpClient,
    origin: &Link,
    entity: &E,
) -> Result<(), ResourceError> {
    let url = entity_self_url(origin, entity)?;
    let body = to_body(entity)?;

    tracing::debug!(kind = E::KIND, url = %url, "updating entity");
    client.put(&url, body).await?;
    Ok(())
}

pub(crate) async fn delete_entity<E: ApiData>(
    client: &HttpClient,
    origin: &Link,
    entity: &E,
) -> Result<(), ResourceError> {
    let url = entity_self_url(origin, entity)?;

    tracing::debug!(kind = E::KIND, url = %url, "deleting entity");
    client.delete(&url).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, ServiceUrl};
    use crate::hal::{EmptyApiData, Links};

    fn link(rel: &str, href: &str) -> Link {
        Link::new(rel, href).unwrap()
    }

    fn offline_client() -> HttpClient {
        let config = ApiConfig::builder()
            .base_url(ServiceUrl::new("http://127.0.0.1:9").unwrap())
            .build()
            .unwrap();
        HttpClient::new(&config).unwrap()
    }

    fn search_data() -> EmptyApiData {
        EmptyApiData::new(Links::new(vec![
            link("self", "http://host/users/search"),
            link("findByUsername", "http://host/users/search/findByUsername{?username}"),
        ]))
    }

    #[test]
    fn test_new_uses_link_as_base_and_self() {
        let resource: Resource<EmptyApiData> = Resource::new(link("self", "http://host/users"));
        assert_eq!(resource.self_link(), resource.templated_base_link());
        assert_eq!(resource.state(), LoadState::Unloaded);
        assert!(!resource.is_loaded());
    }

    #[test]
    fn test_from_links_requires_both_links() {
        let base = link("users", "http://host/users{?page}");
        let this = link("self", "http://host/users?page=1");

        let resource = Resource::<EmptyApiData>::from_links(Some(base.clone()), Some(this.clone())).unwrap();
        assert_eq!(resource.templated_base_link(), &base);
        assert_eq!(resource.self_link(), &this);

        assert!(matches!(
            Resource::<EmptyApiData>::from_links(Some(base), None),
            Err(ResourceError::InvalidConstruction { missing: "self" })
        ));
        assert!(matches!(
            Resource::<EmptyApiData>::from_links(None, Some(this)),
            Err(ResourceError::InvalidConstruction { missing: "templated base" })
        ));
    }

    #[test]
    fn test_target_url_drops_template_expressions() {
        let resource: Resource<EmptyApiData> =
            Resource::new(link("users", "http://host/users{?page,size,sort}"));
        assert_eq!(resource.target_url().unwrap(), "http://host/users");
    }

    #[test]
    fn test_projection_expands_templated_base() {
        let resource: Resource<EmptyApiData> =
            Resource::new(link("user", "http://host/users/7{?projection}"));
        let projected = resource.projection("summary").unwrap();
        assert_eq!(projected.href(), "http://host/users/7?projection=summary");
        assert_eq!(projected.rel(), "user");
    }

    #[test]
    fn test_preloaded_resource_reads_without_network() {
        let client = offline_client();
        let mut resource = Resource::from_payload(search_data()).unwrap();

        assert!(resource.is_loaded());
        assert_eq!(resource.self_link().href(), "http://host/users/search");

        let data = tokio_test::block_on(resource.read(&client)).unwrap();
        assert!(data.link("findByUsername").is_some());
    }

    #[test]
    fn test_preloaded_uses_given_link() {
        let given = link("user", "http://host/users/7{?projection}");
        let resource = Resource::preloaded(given.clone(), search_data());
        assert_eq!(resource.self_link(), &given);
        assert!(resource.is_loaded());
    }

    #[test]
    fn test_from_payload_requires_self_link() {
        let result = Resource::from_payload(EmptyApiData::default());
        assert!(matches!(
            result,
            Err(ResourceError::InvalidConstruction { missing: "self" })
        ));
    }

    #[test]
    fn test_link_for_returns_present_relation() {
        let client = offline_client();
        let mut resource = Resource::from_payload(search_data()).unwrap();

        let found = tokio_test::block_on(resource.link_for(&client, "findByUsername")).unwrap();
        assert_eq!(found.rel(), "findByUsername");
        assert!(found.is_templated());

        let present = tokio_test::block_on(resource.has_link(&client, "findByEmail")).unwrap();
        assert!(!present);
    }

    #[test]
    fn test_link_for_missing_relation_is_malformed_response() {
        let client = offline_client();
        let mut resource = Resource::from_payload(search_data()).unwrap();

        let error = tokio_test::block_on(resource.link_for(&client, "findByEmail")).unwrap_err();
        assert!(matches!(error, ResourceError::MalformedResponse { .. }));

        let message = error.to_string();
        assert!(message.contains("findByEmail"));
        assert!(message.contains("http://host/users/search"));
    }

    #[test]
    fn test_entity_self_url_requires_self_link() {
        let origin = link("self", "http://host/users");
        let result = entity_self_url(&origin, &EmptyApiData::default());
        assert!(matches!(
            result,
            Err(ResourceError::MalformedResponse { rel, link }) if rel == "self" && link.contains("http://host/users")
        ));

        let url = entity_self_url(&origin, &search_data()).unwrap();
        assert_eq!(url, "http://host/users/search");
    }
}
