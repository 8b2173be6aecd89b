//! Typed resources of the user service.
//!
//! Navigation starts at [`ServiceRoot`] and follows relations:
//!
//! ```text
//! ServiceRoot
//! ├── users        -> UsersResource (paged UserApiData)
//! │   └── search   -> UsersSearchResource
//! │       ├── findByUsername   -> UsersSearchResultResource
//! │       └── findUserForLogin -> UsersSearchResultResource
//! └── authorities  -> AuthoritiesResource (paged AuthorityApiData)
//! ```
//!
//! Every paged type implements [`PagedResourceType`](crate::hal::PagedResourceType),
//! so `next_page()` on a `UsersResource` returns another `UsersResource`.

mod authority;
mod root;
mod user;
mod users_search;

pub use authority::{AuthoritiesResource, AuthorityApiData};
pub use root::{ServiceRoot, AUTHORITIES_REL, USERS_REL};
pub use user::{UserApiData, UserResource, UsersResource, USER_REL};
pub use users_search::{
    UsersSearchResource, UsersSearchResultResource, FIND_BY_USERNAME_REL, FIND_USER_FOR_LOGIN_REL,
};
