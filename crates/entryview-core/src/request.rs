//! Ambient request arguments.
//!
//! The search pipeline never reads global request state. Callers hand it a
//! [`RequestArgs`] map built from the incoming query string (or any other
//! source), and every entry point takes that map explicitly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestValue {
    Scalar(String),
    List(Vec<String>),
}

impl RequestValue {
    /// First scalar carried by this value.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s.as_str()),
            Self::List(values) => values.first().map(String::as_str),
        }
    }

    /// True when the value carries no non-blank text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Scalar(s) => s.trim().is_empty(),
            Self::List(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// Drop blank list members; a scalar is returned unchanged.
    pub fn without_blanks(&self) -> Self {
        match self {
            Self::Scalar(s) => Self::Scalar(s.clone()),
            Self::List(values) => Self::List(
                values
                    .iter()
                    .filter(|v| !v.trim().is_empty())
                    .cloned()
                    .collect(),
            ),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Scalar(existing) => {
                *self = Self::List(vec![std::mem::take(existing), value]);
            }
            Self::List(values) => values.push(value),
        }
    }
}

impl From<&str> for RequestValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for RequestValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for RequestValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Ordered request arguments; iteration follows the order keys were supplied.
pub type RequestArgs = IndexMap<String, RequestValue>;

/// Parse an `application/x-www-form-urlencoded` query string into request arguments.
///
/// Keys ending in `[]` collect into a list under the bare key; repeating a plain
/// key also turns its value into a list.
/// Example: `gv_search=smith&filter_4[]=a&filter_4[]=b`
pub fn parse_query(query: &str) -> RequestArgs {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut args = RequestArgs::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let (name, is_list) = match key.strip_suffix("[]") {
            Some(stripped) => (stripped.to_string(), true),
            None => (key.into_owned(), false),
        };
        let value = value.into_owned();

        match args.get_mut(&name) {
            Some(existing) => existing.push(value),
            None if is_list => {
                args.insert(name, RequestValue::List(vec![value]));
            }
            None => {
                args.insert(name, RequestValue::Scalar(value));
            }
        }
    }

    args
}
