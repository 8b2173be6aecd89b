//! # User Service API Client
//!
//! A typed Rust client for the user service's hypermedia (HAL) REST API.
//! Resources are addressed by links, loaded lazily on first access, cached
//! for the lifetime of the resource value, and navigated by relation name.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ApiConfig`] and [`ApiConfigBuilder`]
//! - Validated newtypes for the service URL and credentials
//! - An async HTTP client with hypermedia content negotiation
//! - RFC 6570 link template expansion via [`hal::Link`]
//! - Lazily loaded, write-once cached resources via [`hal::Resource`]
//! - Paged collections with typed page navigation via [`hal::PagedResourceType`]
//! - Typed user service resources in [`resources`]
//!
//! ## Quick Start
//!
//! ```rust
//! use userservice_api::{ApiConfig, DataType, ServiceUrl};
//!
//! let config = ApiConfig::builder()
//!     .base_url(ServiceUrl::new("http://localhost:8080/api").unwrap())
//!     .media_type(DataType::HalJson)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "http://localhost:8080/api");
//! ```
//!
//! ## Navigating Resources
//!
//! ```rust,ignore
//! use userservice_api::{ApiConfig, HttpClient, ServiceUrl};
//! use userservice_api::hal::PagedResourceType;
//! use userservice_api::resources::ServiceRoot;
//!
//! let client = HttpClient::new(&config)?;
//! let mut root = ServiceRoot::from_config(&config)?;
//!
//! // GET /api, then follow the "users" relation
//! let mut users = root.users(&client).await?;
//! for user in users.content(&client).await? {
//!     println!("{:?}", user.username);
//! }
//!
//! // Sibling pages are new values; the current page keeps its cache
//! if users.has_next_page(&client).await? {
//!     let mut next = users.next_page(&client).await?;
//!     println!("{:?}", next.page_metadata(&client).await?);
//! }
//!
//! // Templated search relations
//! let mut search = users.search(&client).await?;
//! let mut found = search.find_by_username(&client, "alice").await?;
//! let alice = found.first_match(&client).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and resources validate on construction
//! - **Borrowed client**: Every network operation takes `&HttpClient`
//! - **Write-once cache**: A resource loads at most once and never invalidates
//! - **Async-first**: Designed for use with the Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod hal;
pub mod resources;

// Re-export public types at crate root for convenience
pub use config::{ApiConfig, ApiConfigBuilder, BasicCredentials, ServiceUrl};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export hypermedia types
pub use hal::{
    ApiData, Link, LinkError, PagedResource, PagedResourceType, Resource, ResourceError,
    ResourceResponse,
};
