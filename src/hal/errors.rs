//! Error types for hypermedia resource operations.
//!
//! # Error Handling
//!
//! - [`ResourceError::InvalidConstruction`]: a required link was missing when
//!   building a resource; raised before any network activity
//! - [`ResourceError::MalformedResponse`]: a loaded payload lacks an expected
//!   relation (or an entity lacks its own `self` link)
//! - [`ResourceError::Deserialization`] / [`ResourceError::Serialization`]:
//!   the body could not be mapped to or from the payload type
//! - [`ResourceError::InvalidLink`]: a link template could not be expanded
//! - [`ResourceError::Http`]: transport failures and non-2xx responses,
//!   passed through unchanged
//!
//! # Example
//!
//! ```rust,ignore
//! use userservice_api::hal::ResourceError;
//!
//! match search.find_by_username(&client, "alice").await {
//!     Ok(result) => { /* ... */ }
//!     Err(ResourceError::MalformedResponse { rel, link }) => {
//!         eprintln!("server no longer offers {rel} at {link}");
//!     }
//!     Err(e) => eprintln!("request failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::hal::LinkError;

/// Error type for hypermedia resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A resource was constructed without a required link.
    #[error("Cannot construct resource: the {missing} link is required")]
    InvalidConstruction {
        /// Which link was absent (`"self"` or `"templated base"`).
        missing: &'static str,
    },

    /// The payload does not contain the expected relation.
    #[error("Link for relation \"{rel}\" not found at {link}")]
    MalformedResponse {
        /// The relation that was looked up.
        rel: String,
        /// The link of the resource that was queried.
        link: String,
    },

    /// The response body could not be deserialized into the payload type.
    #[error("Failed to deserialize {resource} from {url}: {source}")]
    Deserialization {
        /// The payload kind.
        resource: &'static str,
        /// The URL that was loaded.
        url: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An entity could not be serialized into a request body.
    #[error("Failed to serialize {resource}: {source}")]
    Serialization {
        /// The payload kind.
        resource: &'static str,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A link could not be constructed or expanded.
    #[error(transparent)]
    InvalidLink(#[from] LinkError),

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Returns the HTTP status code when the failure came from a server answer.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Http(HttpError::Response(e)) => e.error_reference.as_deref(),
            _ => None,
        }
    }
}
