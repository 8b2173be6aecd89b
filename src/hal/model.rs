//! Payload types for hypermedia resources.
//!
//! Every representation loaded by a [`Resource`](crate::hal::Resource)
//! implements [`ApiData`]. The trait bound is what tells the generic
//! resource which type to deserialize the response body into.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::hal::{Link, Links, NEXT_REL, PREV_REL, SELF_REL};

/// A deserialized representation of a remote entity.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use userservice_api::hal::{ApiData, Links};
///
/// #[derive(Debug, Deserialize)]
/// struct GroupApiData {
///     name: String,
///     #[serde(rename = "_links", alias = "links", default)]
///     links: Links,
/// }
///
/// impl ApiData for GroupApiData {
///     const KIND: &'static str = "Group";
///
///     fn links(&self) -> &Links {
///         &self.links
///     }
/// }
/// ```
pub trait ApiData: DeserializeOwned {
    /// Name of the payload kind, used in logs and error messages.
    const KIND: &'static str;

    /// Returns the payload's link list.
    fn links(&self) -> &Links;

    /// Returns the link with the given relation, if present.
    #[must_use]
    fn link(&self, rel: &str) -> Option<&Link> {
        self.links().get(rel)
    }

    /// Returns the payload's own `self` link, if present.
    #[must_use]
    fn self_link(&self) -> Option<&Link> {
        self.link(SELF_REL)
    }
}

/// A payload with no fields of interest besides its links.
///
/// Used for navigation-only resources such as the API entry point and
/// search resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EmptyApiData {
    #[serde(rename = "_links", alias = "links", default)]
    links: Links,
}

impl EmptyApiData {
    /// Creates a payload carrying only the given links.
    #[must_use]
    pub const fn new(links: Links) -> Self {
        Self { links }
    }
}

impl ApiData for EmptyApiData {
    const KIND: &'static str = "Links";

    fn links(&self) -> &Links {
        &self.links
    }
}

/// Page metadata of a collection resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Zero-based page number.
    pub number: u64,
    /// Requested page size.
    pub size: u64,
    /// Total number of elements across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl PageMetadata {
    /// Returns `true` if this is the first page.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Returns `true` if this is the last page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }
}

/// One page of a collection resource.
///
/// Content is read from the HAL `_embedded` object, where the service keys
/// the item array by collection relation (e.g. `"users"`), or from the
/// verbose `content` array.
#[derive(Clone, Debug, PartialEq)]
pub struct PagedApiData<T> {
    content: Vec<T>,
    page: Option<PageMetadata>,
    links: Links,
}

impl<T> PagedApiData<T> {
    /// Creates a page from its parts.
    #[must_use]
    pub const fn new(content: Vec<T>, page: Option<PageMetadata>, links: Links) -> Self {
        Self {
            content,
            page,
            links,
        }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consumes the page and returns its items.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Returns the page metadata, if the server sent any.
    #[must_use]
    pub const fn page(&self) -> Option<&PageMetadata> {
        self.page.as_ref()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns an iterator over the items on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }

    /// Returns `true` if the page links to a next page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.links.contains(NEXT_REL)
    }

    /// Returns `true` if the page links to a previous page.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.links.contains(PREV_REL)
    }
}

impl<'a, T> IntoIterator for &'a PagedApiData<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}

impl<T: DeserializeOwned> ApiData for PagedApiData<T> {
    const KIND: &'static str = "Page";

    fn links(&self) -> &Links {
        &self.links
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct WirePage<T> {
    #[serde(rename = "_embedded", default = "BTreeMap::new")]
    embedded: BTreeMap<String, Vec<T>>,
    #[serde(default = "Vec::new")]
    content: Vec<T>,
    #[serde(default)]
    page: Option<PageMetadata>,
    #[serde(rename = "_links", alias = "links", default)]
    links: Links,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PagedApiData<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WirePage::<T>::deserialize(deserializer)?;

        let mut content = wire.content;
        for (_, items) in wire.embedded {
            content.extend(items);
        }

        if wire.page.is_none() {
            tracing::warn!(
                self_link = wire.links.get(SELF_REL).map(Link::href),
                "collection payload carries no page metadata"
            );
        }

        Ok(Self {
            content,
            page: wire.page,
            links: wire.links,
        })
    }
}
