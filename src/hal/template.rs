//! URI template expansion (RFC 6570, levels 1 to 3).
//!
//! Relation links published by the service are often templated, e.g.
//! `http://host/users/search/findByUsername{?username}` or
//! `http://host/users{?page,size,sort,projection}`. A [`UriTemplate`] parses
//! such a string once and expands it against a set of string variables.
//! Variables without a value are dropped, which is how an unexpanded link
//! turns into its base URI.
//!
//! # Example
//!
//! ```rust
//! use userservice_api::hal::UriTemplate;
//! use std::collections::HashMap;
//!
//! let template = UriTemplate::parse("http://host/users{?page,size}").unwrap();
//! assert_eq!(template.variables(), vec!["page", "size"]);
//!
//! let mut values = HashMap::new();
//! values.insert("page".to_string(), "2".to_string());
//! assert_eq!(template.expand(&values), "http://host/users?page=2");
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use crate::hal::LinkError;

/// Characters from the RFC 3986 reserved set, passed through by `+` and `#`.
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

/// Expression operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    Path,
    PathParameter,
    Query,
    QueryContinuation,
}

impl Operator {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Reserved),
            '#' => Some(Self::Fragment),
            '.' => Some(Self::Label),
            '/' => Some(Self::Path),
            ';' => Some(Self::PathParameter),
            '?' => Some(Self::Query),
            '&' => Some(Self::QueryContinuation),
            _ => None,
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved => "",
            Self::Fragment => "#",
            Self::Label => ".",
            Self::Path => "/",
            Self::PathParameter => ";",
            Self::Query => "?",
            Self::QueryContinuation => "&",
        }
    }

    const fn separator(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved | Self::Fragment => ",",
            Self::Label => ".",
            Self::Path => "/",
            Self::PathParameter => ";",
            Self::Query | Self::QueryContinuation => "&",
        }
    }

    const fn named(self) -> bool {
        matches!(
            self,
            Self::PathParameter | Self::Query | Self::QueryContinuation
        )
    }

    const fn allows_reserved(self) -> bool {
        matches!(self, Self::Reserved | Self::Fragment)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct VarSpec {
    name: String,
    prefix: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression {
        operator: Operator,
        variables: Vec<VarSpec>,
    },
}

/// A parsed URI template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    parts: Vec<Part>,
}

impl UriTemplate {
    /// Parses a URI template.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::MalformedTemplate`] for unbalanced braces, empty
    /// expressions, invalid variable names or prefix modifiers.
    pub fn parse(source: &str) -> Result<Self, LinkError> {
        let malformed = |reason: &str| LinkError::MalformedTemplate {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(malformed("unexpected '}'"));
            }
            if open > 0 {
                parts.push(Part::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| malformed("unclosed '{'"))?;
            let expression = &after[..close];
            if expression.contains('{') {
                return Err(malformed("nested '{'"));
            }
            parts.push(Self::parse_expression(expression).map_err(malformed)?);
            rest = &after[close + 1..];
        }

        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    fn parse_expression(expression: &str) -> Result<Part, &'static str> {
        let mut chars = expression.chars();
        let (operator, body) = match chars.next().and_then(Operator::from_char) {
            Some(operator) => (operator, chars.as_str()),
            None => (Operator::Simple, expression),
        };

        if body.is_empty() {
            return Err("empty expression");
        }

        let variables = body
            .split(',')
            .map(|spec| {
                let spec = spec.strip_suffix('*').unwrap_or(spec);
                let (name, prefix) = match spec.split_once(':') {
                    Some((name, length)) => {
                        let length: usize = length.parse().map_err(|_| "invalid prefix modifier")?;
                        if length == 0 || length >= 10_000 {
                            return Err("invalid prefix modifier");
                        }
                        (name, Some(length))
                    }
                    None => (spec, None),
                };
                let valid = !name.is_empty()
                    && name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%'));
                if !valid {
                    return Err("invalid variable name");
                }
                Ok(VarSpec {
                    name: name.to_string(),
                    prefix,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Part::Expression {
            operator,
            variables,
        })
    }

    /// Returns the template source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the template has at least one expression.
    #[must_use]
    pub fn is_templated(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, Part::Expression { .. }))
    }

    /// Returns the variable names in template order, without duplicates.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for part in &self.parts {
            if let Part::Expression { variables, .. } = part {
                for var in variables {
                    if !names.contains(&var.name.as_str()) {
                        names.push(&var.name);
                    }
                }
            }
        }
        names
    }

    /// Expands the template. Variables missing from `values` are dropped.
    #[must_use]
    pub fn expand(&self, values: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(self.source.len());

        for part in &self.parts {
            match part {
                Part::Literal(literal) => out.push_str(literal),
                Part::Expression {
                    operator,
                    variables,
                } => Self::expand_expression(&mut out, *operator, variables, values),
            }
        }

        out
    }

    fn expand_expression(
        out: &mut String,
        operator: Operator,
        variables: &[VarSpec],
        values: &HashMap<String, String>,
    ) {
        let mut first = true;

        for var in variables {
            let Some(value) = values.get(&var.name) else {
                continue;
            };

            out.push_str(if first {
                operator.prefix()
            } else {
                operator.separator()
            });
            first = false;

            let value = match var.prefix {
                Some(length) => value.chars().take(length).collect::<String>(),
                None => value.clone(),
            };

            if operator.named() {
                out.push_str(&var.name);
                if value.is_empty() {
                    if operator != Operator::PathParameter {
                        out.push('=');
                    }
                    continue;
                }
                out.push('=');
            }

            if operator.allows_reserved() {
                encode_reserved(out, &value);
            } else {
                out.push_str(&urlencoding::encode(&value));
            }
        }
    }
}

/// Percent-encodes everything outside the unreserved and reserved sets,
/// keeping existing pct-encoded triplets intact.
fn encode_reserved(out: &mut String, value: &str) {
    let bytes = value.as_bytes();
    let mut i = 0;
    for c in value.chars() {
        let len = c.len_utf8();
        let is_triplet = c == '%'
            && bytes.len() > i + 2
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit();

        let unreserved = c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
        if unreserved || RESERVED.contains(c) || is_triplet {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).as_bytes() {
                let _ = write!(out, "%{byte:02X}");
            }
        }
        i += len;
    }
}
