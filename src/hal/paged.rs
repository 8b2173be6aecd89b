//! Paged collection resources.
//!
//! [`PagedResource<T>`] is a [`Resource`] over [`PagedApiData<T>`]. Moving
//! to another page never mutates the current instance; it builds a sibling
//! through [`PagedResourceType::create_resource_instance`], so a concrete
//! wrapper type such as `UsersResource` navigates to another `UsersResource`.
//!
//! # Example
//!
//! ```rust,ignore
//! use userservice_api::hal::PagedResourceType;
//!
//! let mut page = root.users(&client).await?;
//! while page.has_next_page(&client).await? {
//!     page = page.next_page(&client).await?;
//!     for user in page.content(&client).await? {
//!         println!("{}", user.username);
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::HttpClient;
use crate::hal::{
    create_entity, delete_entity, update_entity, ApiData, Link, PageMetadata, PagedApiData,
    Resource, ResourceError, FIRST_REL, LAST_REL, NEXT_REL, PAGE_PARAM, PREV_REL, SIZE_PARAM,
};

/// A lazily loaded page of a collection of `T`.
#[derive(Clone, Debug)]
pub struct PagedResource<T> {
    resource: Resource<PagedApiData<T>>,
}

impl<T> PagedResource<T> {
    /// Creates a paged resource whose base and `self` link are the same.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            resource: Resource::new(link),
        }
    }

    /// Creates a paged resource from a templated base link and a `self` link.
    #[must_use]
    pub const fn with_base(templated_base_link: Link, self_link: Link) -> Self {
        Self {
            resource: Resource::with_base(templated_base_link, self_link),
        }
    }

    /// Creates a paged resource from links that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConstruction`] naming the missing link.
    pub fn from_links(
        templated_base_link: Option<Link>,
        self_link: Option<Link>,
    ) -> Result<Self, ResourceError> {
        Ok(Self {
            resource: Resource::from_links(templated_base_link, self_link)?,
        })
    }

    /// Returns the underlying resource.
    #[must_use]
    pub const fn resource(&self) -> &Resource<PagedApiData<T>> {
        &self.resource
    }

    /// Returns the underlying resource mutably, for loading.
    pub fn resource_mut(&mut self) -> &mut Resource<PagedApiData<T>> {
        &mut self.resource
    }

    /// Returns the `self` link.
    #[must_use]
    pub const fn self_link(&self) -> &Link {
        self.resource.self_link()
    }

    /// Returns the templated base link.
    #[must_use]
    pub const fn templated_base_link(&self) -> &Link {
        self.resource.templated_base_link()
    }

    /// Returns the templated base link expanded for the given page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn page_link(&self, number: u64, size: u64) -> Result<Link, ResourceError> {
        let mut params = HashMap::new();
        params.insert(PAGE_PARAM.to_string(), number.to_string());
        params.insert(SIZE_PARAM.to_string(), size.to_string());
        Ok(self.templated_base_link().expand_map(&params)?)
    }

    /// Returns the templated base link expanded with a projection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn projection(&self, projection: &str) -> Result<Link, ResourceError> {
        self.resource.projection(projection)
    }
}

impl<T: DeserializeOwned> PagedResource<T> {
    /// Returns the cached page, loading it first if necessary.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn read(&mut self, client: &HttpClient) -> Result<&PagedApiData<T>, ResourceError> {
        self.resource.read(client).await
    }

    /// Returns the items on this page.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn content(&mut self, client: &HttpClient) -> Result<&[T], ResourceError> {
        Ok(self.read(client).await?.content())
    }

    /// Returns the page metadata, if the server sent any.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn page_metadata(
        &mut self,
        client: &HttpClient,
    ) -> Result<Option<PageMetadata>, ResourceError> {
        Ok(self.read(client).await?.page().copied())
    }

    /// Returns the `next` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] on the last page.
    pub async fn next_link(&mut self, client: &HttpClient) -> Result<Link, ResourceError> {
        self.resource.link_for(client, NEXT_REL).await
    }

    /// Returns the `prev` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] on the first page.
    pub async fn previous_link(&mut self, client: &HttpClient) -> Result<Link, ResourceError> {
        self.resource.link_for(client, PREV_REL).await
    }

    /// Returns the `first` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the server sent none.
    pub async fn first_link(&mut self, client: &HttpClient) -> Result<Link, ResourceError> {
        self.resource.link_for(client, FIRST_REL).await
    }

    /// Returns the `last` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the server sent none.
    pub async fn last_link(&mut self, client: &HttpClient) -> Result<Link, ResourceError> {
        self.resource.link_for(client, LAST_REL).await
    }
}

impl<T: ApiData + Serialize> PagedResource<T> {
    /// POSTs `entity` to this collection.
    ///
    /// # Errors
    ///
    /// See [`Resource::create`].
    pub async fn create(&self, client: &HttpClient, entity: &T) -> Result<Option<T>, ResourceError> {
        create_entity(client, self.self_link(), entity).await
    }

    /// PUTs `entity` to its own `self` link.
    ///
    /// # Errors
    ///
    /// See [`Resource::update`].
    pub async fn update(&self, client: &HttpClient, entity: &T) -> Result<(), ResourceError> {
        update_entity(client, self.self_link(), entity).await
    }

    /// DELETEs `entity` at its own `self` link.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&self, client: &HttpClient, entity: &T) -> Result<(), ResourceError> {
        delete_entity(client, self.self_link(), entity).await
    }
}

/// Navigation between pages of a concrete collection type.
///
/// Implementors provide access to their [`PagedResource`] and a factory that
/// builds a new instance of the same type from a templated base and a `self`
/// link; the provided methods
/// then return siblings of `Self` rather than bare paged resources.
///
/// # Example
///
/// ```rust,ignore
/// struct GroupsResource(PagedResource<GroupApiData>);
///
/// impl PagedResourceType for GroupsResource {
///     type Item = GroupApiData;
///
///     fn paged(&self) -> &PagedResource<GroupApiData> { &self.0 }
///     fn paged_mut(&mut self) -> &mut PagedResource<GroupApiData> { &mut self.0 }
///     fn create_resource_instance(templated_base_link: Link, self_link: Link) -> Self {
///         Self(PagedResource::with_base(templated_base_link, self_link))
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait PagedResourceType: Sized {
    /// The item type listed on each page.
    type Item: DeserializeOwned;

    /// Returns the underlying paged resource.
    fn paged(&self) -> &PagedResource<Self::Item>;

    /// Returns the underlying paged resource mutably.
    fn paged_mut(&mut self) -> &mut PagedResource<Self::Item>;

    /// Builds a new instance of the implementing type.
    fn create_resource_instance(templated_base_link: Link, self_link: Link) -> Self;

    /// Builds a sibling page at `link`. The link is expanded and the
    /// templated base link is carried over, so paging and projections keep
    /// working on the sibling.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    fn sibling(&self, link: &Link) -> Result<Self, ResourceError> {
        let self_link = link.expand()?;
        let templated_base_link = self.paged().templated_base_link().clone();
        Ok(Self::create_resource_instance(templated_base_link, self_link))
    }

    /// Returns the following page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] on the last page.
    async fn next_page(&mut self, client: &HttpClient) -> Result<Self, ResourceError> {
        let link = self.paged_mut().next_link(client).await?;
        self.sibling(&link)
    }

    /// Returns the preceding page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] on the first page.
    async fn previous_page(&mut self, client: &HttpClient) -> Result<Self, ResourceError> {
        let link = self.paged_mut().previous_link(client).await?;
        self.sibling(&link)
    }

    /// Returns the first page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the server sent no `first` link.
    async fn first_page(&mut self, client: &HttpClient) -> Result<Self, ResourceError> {
        let link = self.paged_mut().first_link(client).await?;
        self.sibling(&link)
    }

    /// Returns the last page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the server sent no `last` link.
    async fn last_page(&mut self, client: &HttpClient) -> Result<Self, ResourceError> {
        let link = self.paged_mut().last_link(client).await?;
        self.sibling(&link)
    }

    /// Returns `true` if a following page exists.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    async fn has_next_page(&mut self, client: &HttpClient) -> Result<bool, ResourceError> {
        self.paged_mut().resource_mut().has_link(client, NEXT_REL).await
    }

    /// Returns `true` if a preceding page exists.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    async fn has_previous_page(&mut self, client: &HttpClient) -> Result<bool, ResourceError> {
        self.paged_mut().resource_mut().has_link(client, PREV_REL).await
    }

    /// Returns the page with the given number and size, built from the
    /// templated base link. No request is made.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    fn page(&self, number: u64, size: u64) -> Result<Self, ResourceError> {
        let link = self.paged().page_link(number, size)?;
        self.sibling(&link)
    }
}

impl<T: DeserializeOwned> PagedResourceType for PagedResource<T> {
    type Item = T;

    fn paged(&self) -> &PagedResource<T> {
        self
    }

    fn paged_mut(&mut self) -> &mut PagedResource<T> {
        self
    }

    fn create_resource_instance(templated_base_link: Link, self_link: Link) -> Self {
        Self::with_base(templated_base_link, self_link)
    }
}
