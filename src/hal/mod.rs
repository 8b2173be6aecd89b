//! Hypermedia (HAL) resource layer.
//!
//! This module provides the generic building blocks the concrete
//! [`resources`](crate::resources) are made of:
//!
//! - [`UriTemplate`]: RFC 6570 URI template parsing and expansion
//! - [`Link`] / [`Links`]: relation-named, possibly templated links
//! - [`ApiData`]: the trait every typed payload implements
//! - [`Resource`]: a lazily loaded resource with a write-once cache
//! - [`PagedResource`] / [`PagedResourceType`]: collection pages with
//!   typed navigation to sibling pages
//! - [`ResourceError`]: unified error type for resource operations
//!
//! # Example
//!
//! ```rust,ignore
//! use userservice_api::hal::{EmptyApiData, Link, Resource};
//!
//! let mut root: Resource<EmptyApiData> = Resource::new(Link::new("self", "http://localhost:8080/api")?);
//! let users_link = root.link_for(&client, "users").await?;
//! ```

mod errors;
mod link;
mod model;
mod paged;
mod resource;
mod response;
mod template;

pub use errors::ResourceError;
pub use link::{Link, LinkError, Links};
pub use model::{ApiData, EmptyApiData, PageMetadata, PagedApiData};
pub use paged::{PagedResource, PagedResourceType};
pub use resource::{LoadFailure, LoadState, Resource};
pub use response::ResourceResponse;
pub use template::UriTemplate;

pub(crate) use resource::{create_entity, delete_entity, update_entity};

/// Relation of a payload's own link.
pub const SELF_REL: &str = "self";

/// Relation of the following page of a collection.
pub const NEXT_REL: &str = "next";

/// Relation of the preceding page of a collection.
pub const PREV_REL: &str = "prev";

/// Relation of the first page of a collection.
pub const FIRST_REL: &str = "first";

/// Relation of the last page of a collection.
pub const LAST_REL: &str = "last";

/// Relation of a collection's search resource.
pub const SEARCH_REL: &str = "search";

/// Query variable selecting a server-side projection.
pub const PROJECTION_PARAM: &str = "projection";

/// Query variable selecting a page number.
pub const PAGE_PARAM: &str = "page";

/// Query variable selecting a page size.
pub const SIZE_PARAM: &str = "size";
