//! User entities and the users collection.
//!
//! # Example
//!
//! ```rust,ignore
//! use userservice_api::resources::{ServiceRoot, UserApiData};
//!
//! let mut root = ServiceRoot::from_config(&config)?;
//! let users = root.users(&client).await?;
//!
//! let new_user = UserApiData {
//!     username: Some("alice".to_string()),
//!     password: Some("secret".to_string()),
//!     email: Some("alice@example.com".to_string()),
//!     enabled: Some(true),
//!     ..Default::default()
//! };
//! let created = users.create(&client, &new_user).await?;
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clients::HttpClient;
use crate::hal::{
    ApiData, Link, Links, PageMetadata, PagedResource, PagedResourceType, Resource, ResourceError,
    SEARCH_REL,
};
use crate::resources::{AuthorityApiData, UsersSearchResource};

/// The relation naming a user entity; templated with `{?projection}`.
pub const USER_REL: &str = "user";

/// A user account.
///
/// Fields the server omits are `None`. Links are read from the response and
/// never written back.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserApiData {
    /// The login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// The password. Only sent on create and update; the service does not
    /// return it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// The e-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Whether the account may log in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// The day the account was registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<NaiveDate>,

    /// Granted authorities, present when a projection embeds them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<AuthorityApiData>>,

    #[serde(rename = "_links", alias = "links", default, skip_serializing)]
    links: Links,
}

impl UserApiData {
    /// Creates user data with the given username and no other fields.
    #[must_use]
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

impl ApiData for UserApiData {
    const KIND: &'static str = "User";

    fn links(&self) -> &Links {
        &self.links
    }
}

impl fmt::Debug for UserApiData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserApiData")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "*****"))
            .field("email", &self.email)
            .field("enabled", &self.enabled)
            .field("registration_date", &self.registration_date)
            .field("authorities", &self.authorities)
            .field("links", &self.links)
            .finish()
    }
}

/// A single user entity.
#[derive(Clone, Debug)]
pub struct UserResource {
    resource: Resource<UserApiData>,
}

impl UserResource {
    /// Creates an unloaded user resource for `link`.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            resource: Resource::new(link),
        }
    }

    /// Creates a loaded user resource from data listed on a page.
    ///
    /// The `user` relation, when present, becomes the templated base so that
    /// projections can be requested from an untemplated `self` link.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConstruction`] if the data has no `self` link.
    pub fn from_payload(data: UserApiData) -> Result<Self, ResourceError> {
        let self_link = data
            .self_link()
            .cloned()
            .ok_or(ResourceError::InvalidConstruction { missing: "self" })?;
        let templated_base_link = data
            .link(USER_REL)
            .cloned()
            .unwrap_or_else(|| self_link.clone());
        Ok(Self {
            resource: Resource::preloaded_with_base(templated_base_link, self_link, data),
        })
    }

    /// Returns the user's `self` link.
    #[must_use]
    pub const fn self_link(&self) -> &Link {
        self.resource.self_link()
    }

    /// Returns the user data, loading it on first access.
    ///
    /// # Errors
    ///
    /// See [`Resource::response`].
    pub async fn read(&mut self, client: &HttpClient) -> Result<&UserApiData, ResourceError> {
        self.resource.read(client).await
    }

    /// Writes `user` to its `self` link.
    ///
    /// # Errors
    ///
    /// See [`Resource::update`].
    pub async fn update(&self, client: &HttpClient, user: &UserApiData) -> Result<(), ResourceError> {
        self.resource.update(client, user).await
    }

    /// Deletes `user` at its `self` link.
    ///
    /// # Errors
    ///
    /// See [`Resource::delete`].
    pub async fn delete(&self, client: &HttpClient, user: &UserApiData) -> Result<(), ResourceError> {
        self.resource.delete(client, user).await
    }

    /// Returns an unloaded resource for the same user in the given projection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn projection(&self, projection: &str) -> Result<Self, ResourceError> {
        let link = self.resource.projection(projection)?;
        Ok(Self {
            resource: Resource::with_base(self.resource.templated_base_link().clone(), link),
        })
    }
}

/// The paged collection of all users.
#[derive(Clone, Debug)]
pub struct UsersResource {
    paged: PagedResource<UserApiData>,
}

impl UsersResource {
    /// Creates an unloaded users collection for `link`.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            paged: PagedResource::new(link),
        }
    }

    /// Returns the users on this page.
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

    /// Returns a loaded [`UserResource`] for every user on this page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConstruction`] if a listed user has no
    /// `self` link, or any error from loading the page.
    pub async fn users(&mut self, client: &HttpClient) -> Result<Vec<UserResource>, ResourceError> {
        self.content(client)
            .await?
            .iter()
            .cloned()
            .map(UserResource::from_payload)
            .collect()
    }

    /// Follows the `search` relation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponse`] if the collection offers no search.
    pub async fn search(&mut self, client: &HttpClient) -> Result<UsersSearchResource, ResourceError> {
        let link = self.paged.resource_mut().link_for(client, SEARCH_REL).await?;
        Ok(UsersSearchResource::new(link))
    }

    /// Creates a new user.
    ///
    /// Returns the stored user when the server sends it back.
    ///
    /// # Errors
    ///
    /// See [`Resource::create`].
    pub async fn create(
        &self,
        client: &HttpClient,
        user: &UserApiData,
    ) -> Result<Option<UserApiData>, ResourceError> {
        self.paged.create(client, user).await
    }

    /// Returns an unloaded collection in the given projection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidLink`] if the link is not a valid template.
    pub fn with_projection(&self, projection: &str) -> Result<Self, ResourceError> {
        let link = self.paged.projection(projection)?;
        Ok(Self {
            paged: PagedResource::with_base(self.paged.templated_base_link().clone(), link),
        })
    }
}

impl PagedResourceType for UsersResource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_data_deserializes_hal_entity() {
        let user: UserApiData = serde_json::from_value(json!({
            "username": "alice",
            "email": "alice@example.com",
            "enabled": true,
            "registrationDate": "2016-03-01",
            "_links": {
                "self": {"href": "http://host/users/1{?projection}", "templated": true},
                "authorities": {"href": "http://host/users/1/authorities"}
            }
        }))
        .unwrap();

        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.enabled, Some(true));
        assert_eq!(
            user.registration_date,
            Some(NaiveDate::from_ymd_opt(2016, 3, 1).unwrap())
        );
        assert!(user.password.is_none());
        assert_eq!(user.self_link().unwrap().href(), "http://host/users/1{?projection}");
        assert!(user.link("authorities").is_some());
    }

    #[test]
    fn test_user_data_serializes_without_links_or_empty_fields() {
        let mut user = UserApiData::with_username("bob");
        user.password = Some("secret".to_string());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value, json!({"username": "bob", "password": "secret"}));
    }

    #[test]
    fn test_user_data_debug_masks_password() {
        let mut user = UserApiData::with_username("bob");
        user.password = Some("hunter2".to_string());

        let debug = format!("{user:?}");
        assert!(debug.contains("bob"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("*****"));
    }

    #[test]
    fn test_user_projection_keeps_templated_base() {
        let user = UserResource::new(Link::new("self", "http://host/users/1{?projection}").unwrap());
        let projected = user.projection("full").unwrap();

        assert_eq!(projected.self_link().href(), "http://host/users/1?projection=full");
        assert_eq!(
            projected.resource.templated_base_link().href(),
            "http://host/users/1{?projection}"
        );
    }

    #[test]
    fn test_users_with_projection() {
        let users = UsersResource::new(
            Link::new("users", "http://host/users{?page,size,sort,projection}").unwrap(),
        );
        let projected = users.with_projection("summary").unwrap();
        assert_eq!(
            projected.paged().self_link().href(),
            "http://host/users?projection=summary"
        );
    }

    #[test]
    fn test_users_create_resource_instance_is_unloaded() {
        let base = Link::new("users", "http://host/users{?page,size,sort,projection}").unwrap();
        let link = Link::new("next", "http://host/users?page=1&size=20").unwrap();
        let page = UsersResource::create_resource_instance(base.clone(), link.clone());
        assert_eq!(page.paged().self_link(), &link);
        assert_eq!(page.paged().templated_base_link(), &base);
        assert!(!page.paged().resource().is_loaded());
    }

    #[test]
    fn test_from_payload_projection_uses_user_relation() {
        let user: UserApiData = serde_json::from_value(json!({
            "username": "alice",
            "_links": {
                "self": {"href": "http://host/users/1"},
                "user": {"href": "http://host/users/1{?projection}", "templated": true}
            }
        }))
        .unwrap();

        let resource = UserResource::from_payload(user).unwrap();
        assert_eq!(resource.self_link().href(), "http://host/users/1");

        let projected = resource.projection("full").unwrap();
        assert_eq!(projected.self_link().href(), "http://host/users/1?projection=full");
    }

    #[test]
    fn test_from_payload_without_user_relation_falls_back_to_self() {
        let user: UserApiData = serde_json::from_value(json!({
            "_links": {"self": {"href": "http://host/users/1{?projection}", "templated": true}}
        }))
        .unwrap();

        let resource = UserResource::from_payload(user).unwrap();
        let projected = resource.projection("summary").unwrap();
        assert_eq!(projected.self_link().href(), "http://host/users/1?projection=summary");
    }
}
