//! Hypermedia links and link collections.
//!
//! A [`Link`] pairs a relation name with a possibly templated URI. Links are
//! immutable; expanding one returns a new link with the same relation and a
//! concrete `href`.
//!
//! [`Links`] is the link list carried by every payload. It deserializes from
//! both shapes the service can produce:
//!
//! - HAL (`application/hal+json`): an object keyed by relation
//!   (`"_links": {"self": {"href": "..."}}`), where a relation may also map
//!   to an array of link objects
//! - Spring Data verbose (`application/x-spring-data-verbose+json`): an array
//!   of `{"rel": "...", "href": "..."}` objects
//!
//! # Example
//!
//! ```rust
//! use userservice_api::hal::Link;
//!
//! let link = Link::new("findByUsername", "http://host/users/search/findByUsername{?username}").unwrap();
//! assert!(link.is_templated());
//!
//! let expanded = link.expand_with(&["alice"]).unwrap();
//! assert_eq!(expanded.href(), "http://host/users/search/findByUsername?username=alice");
//! assert_eq!(expanded.rel(), "findByUsername");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

use crate::hal::UriTemplate;

/// Errors raised when constructing or expanding a link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The link has no URI.
    #[error("Link for relation \"{rel}\" has an empty href")]
    EmptyHref {
        /// The relation of the offending link.
        rel: String,
    },

    /// The URI template cannot be parsed.
    #[error("Malformed URI template '{template}': {reason}")]
    MalformedTemplate {
        /// The template source.
        template: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A named, possibly templated link to a remote resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    rel: String,
    href: String,
}

impl Link {
    /// Creates a new link.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::EmptyHref`] if `href` is empty.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Result<Self, LinkError> {
        let rel = rel.into();
        let href = href.into();
        if href.trim().is_empty() {
            return Err(LinkError::EmptyHref { rel });
        }
        Ok(Self { rel, href })
    }

    /// Returns the relation name.
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Returns the (possibly templated) URI.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Returns `true` if the URI contains template expressions.
    #[must_use]
    pub fn is_templated(&self) -> bool {
        self.href.contains('{')
    }

    /// Returns the template variable names in order of appearance.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::MalformedTemplate`] if the URI is not a valid template.
    pub fn variables(&self) -> Result<Vec<String>, LinkError> {
        let template = UriTemplate::parse(&self.href)?;
        Ok(template.variables().into_iter().map(String::from).collect())
    }

    /// Expands the link with no variables, dropping every template expression.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::MalformedTemplate`] if the URI is not a valid template.
    pub fn expand(&self) -> Result<Self, LinkError> {
        self.expand_map(&HashMap::new())
    }

    /// Expands the link by filling `values` into the template variables in
    /// order of appearance. Surplus values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::MalformedTemplate`] if the URI is not a valid template.
    pub fn expand_with<S: AsRef<str>>(&self, values: &[S]) -> Result<Self, LinkError> {
        let template = UriTemplate::parse(&self.href)?;
        let params: HashMap<String, String> = template
            .variables()
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value.as_ref().to_string()))
            .collect();
        self.expanded(&template, &params)
    }

    /// Expands the link with named variables.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::MalformedTemplate`] if the URI is not a valid template.
    pub fn expand_map(&self, params: &HashMap<String, String>) -> Result<Self, LinkError> {
        let template = UriTemplate::parse(&self.href)?;
        self.expanded(&template, params)
    }

    fn expanded(
        &self,
        template: &UriTemplate,
        params: &HashMap<String, String>,
    ) -> Result<Self, LinkError> {
        Self::new(self.rel.clone(), template.expand(params))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>;rel=\"{}\"", self.href, self.rel)
    }
}

/// The link list of a payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Links(Vec<Link>);

impl Links {
    /// Creates a link list.
    #[must_use]
    pub const fn new(links: Vec<Link>) -> Self {
        Self(links)
    }

    /// Returns the first link with the given relation.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|link| link.rel == rel)
    }

    /// Returns every link with the given relation.
    pub fn all(&self, rel: &str) -> impl Iterator<Item = &Link> {
        let rel = rel.to_string();
        self.0.iter().filter(move |link| link.rel == rel)
    }

    /// Returns `true` if a link with the given relation exists.
    #[must_use]
    pub fn contains(&self, rel: &str) -> bool {
        self.get(rel).is_some()
    }

    /// Returns an iterator over all links.
    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.0.iter()
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a link.
    pub fn push(&mut self, link: Link) {
        self.0.push(link);
    }
}

impl From<Vec<Link>> for Links {
    fn from(links: Vec<Link>) -> Self {
        Self(links)
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Deserialize)]
struct HalLinkObject {
    href: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HalRelation {
    One(HalLinkObject),
    Many(Vec<HalLinkObject>),
}

#[derive(Deserialize)]
struct VerboseLink {
    rel: String,
    href: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireLinks {
    Hal(BTreeMap<String, HalRelation>),
    Verbose(Vec<VerboseLink>),
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs: Vec<(String, String)> = match WireLinks::deserialize(deserializer)? {
            WireLinks::Hal(relations) => relations
                .into_iter()
                .flat_map(|(rel, relation)| {
                    let objects = match relation {
                        HalRelation::One(object) => vec![object],
                        HalRelation::Many(objects) => objects,
                    };
                    objects.into_iter().map(move |object| (rel.clone(), object.href))
                })
                .collect(),
            WireLinks::Verbose(links) => links.into_iter().map(|link| (link.rel, link.href)).collect(),
        };

        let mut links: Vec<Link> = pairs
            .into_iter()
            .map(|(rel, href)| Link::new(rel, href).map_err(de::Error::custom))
            .collect::<Result<_, _>>()?;

        // Keep `self` first so diagnostics read naturally.
        links.sort_by_key(|link| link.rel != super::SELF_REL);
        Ok(Self(links))
    }
}
