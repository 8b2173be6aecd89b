//! The users search resource.
//!
//! The service publishes its user queries as templated links on
//! `users/search`. Each query expands its template with the username and
//! yields a paged result.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut search = root.users(&client).await?.search(&client).await?;
//! let mut result = search.find_by_username(&client, "alice").await?;
//!
//! for user in result.content(&client).await? {
//!     println!("{:?}", user.email);
//! }
//! ```

use crate::clients::HttpClient;
use crate::hal::{
    EmptyApiData, Link, PageMetadata, PagedResource, PagedResourceType, Resource, ResourceError,
};
use crate::resources::{UserApiData, UserResource};

/// Relation of the exact username query.
pub const FIND_BY_USERNAME_REL: &str = "findByUsername";

/// Relation of the login query, which also matches disabled accounts.
pub const FIND_USER_FOR_LOGIN_REL: &str = "findUserForLogin";

/// Navigation resource listing the available user queries.
#[derive(Clone, Debug)]
pub struct UsersSearchResource {
    resource: Resource<EmptyApiData>,
}

impl UsersSearchResource {
    /// Creates an unloaded search resource for `link`.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            resource: Resource::new(link),
        }
    }

    /// Returns the search resource's `self` link.
    #[must_use]
    pub const fn self_link(&self) -> &Link {
        self.resource.self_link()
    }

    /// Runs the `findByUsername` query.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the service does not
    /// offer the query, or any error from loading the search resource.
    pub async fn find_by_username(
        &mut self,
        client: &HttpClient,
        username: &str,
    ) -> Result<UsersSearchResultResource, ResourceError> {
        self.query(client, FIND_BY_USERNAME_REL, username).await
    }

    /// Runs the `findUserForLogin` query.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the service does not
    /// offer the query, or any error from loading the search resource.
    pub async fn find_user_for_login(
        &mut self,
        client: &HttpClient,
        username: &str,
    ) -> Result<UsersSearchResultResource, ResourceError> {
        self.query(client, FIND_USER_FOR_LOGIN_REL, username).await
    }

    async fn query(
        &mut self,
        client: &HttpClient,
        rel: &str,
        username: &str,
    ) -> Result<UsersSearchResultResource, ResourceError> {
        let template = self.resource.link_for(client, rel).await?;
        let link = template.expand_with(&[username])?;
        tracing::debug!(query = rel, link = %link, "expanded user query");
        Ok(UsersSearchResultResource::create_resource_instance(
            link.clone(),
            link,
        ))
    }
}

/// A page of users matching a search query.
#[derive(Clone, Debug)]
pub struct UsersSearchResultResource {
    paged: PagedResource<UserApiData>,
}

impl UsersSearchResultResource {
    /// Returns the matching users on this page.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn content(&mut self, client: &HttpClient) -> Result<&[UserApiData], ResourceError> {
        self.paged.content(client).await
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
        self.paged.page_metadata(client).await
    }

    /// Returns the first matching user, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConstruction`] if the user has no
    /// `self` link, or any error from loading the page.
    pub async fn first_match(
        &mut self,
        client: &HttpClient,
    ) -> Result<Option<UserResource>, ResourceError> {
        self.content(client)
            .await?
            .first()
            .cloned()
            .map(UserResource::from_payload)
            .transpose()
    }
}

impl PagedResourceType for UsersSearchResultResource {
    type Item = UserApiData;

    fn paged(&self) -> &PagedResource<UserApiData> {
        &self.paged
    }

    fn paged_mut(&mut self) -> &mut PagedResource<UserApiData> {
        &mut self.paged
    }

    fn create_resource_instance(templated_base_link: Link, self_link: Link) -> Self {
        Self {
            paged: PagedResource::with_base(templated_base_link, self_link),
        }
    }
}
