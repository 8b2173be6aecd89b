//! Response wrapper for loaded resources.
//!
//! [`ResourceResponse<T>`] combines a loaded payload with the metadata of the
//! response it came from. It implements `Deref<Target = T>` for ergonomic
//! access to the payload.
//!
//! # Example
//!
//! ```rust,ignore
//! let response = users.resource_mut().response(&client).await?;
//!
//! // Access the page directly via Deref
//! for user in response.iter() {
//!     println!("{}", user.username);
//! }
//!
//! println!("status {:?}, request {:?}", response.status(), response.request_id());
//! ```

use std::ops::Deref;

use crate::clients::HttpResponse;
use crate::hal::{ApiData, ResourceError};

/// A loaded payload together with its response metadata.
///
/// # Example
///
/// ```rust
/// use userservice_api::hal::ResourceResponse;
///
/// let response = ResourceResponse::new(vec!["alice", "bob"], Some(200), Some("req-123".to_string()));
///
/// assert_eq!(response.len(), 2);
/// assert_eq!(response[0], "alice");
/// assert_eq!(response.status(), Some(200));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResponse<T> {
    data: T,
    /// `None` for payloads that were handed in rather than fetched.
    status: Option<u16>,
    request_id: Option<String>,
}

impl<T> ResourceResponse<T> {
    /// Creates a new `ResourceResponse`.
    #[must_use]
    pub const fn new(data: T, status: Option<u16>, request_id: Option<String>) -> Self {
        Self {
            data,
            status,
            request_id,
        }
    }

    /// Wraps a payload that did not come from a response.
    #[must_use]
    pub const fn preloaded(data: T) -> Self {
        Self::new(data, None, None)
    }

    /// Consumes the response and returns the inner data.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns a reference to the inner data.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Returns the HTTP status code of the response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the request ID from the X-Request-Id header, if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl<T: ApiData> ResourceResponse<T> {
    /// Deserializes a successful HTTP response into the payload type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialization`] if the body is not a valid `T`.
    pub fn from_http_response(response: &HttpResponse, url: &str) -> Result<Self, ResourceError> {
        let data = response
            .json::<T>()
            .map_err(|source| ResourceError::Deserialization {
                resource: T::KIND,
                url: url.to_string(),
                source,
            })?;

        Ok(Self::new(
            data,
            Some(response.code),
            response.request_id().map(String::from),
        ))
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
