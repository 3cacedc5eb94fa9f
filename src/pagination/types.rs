//! Pagination types
//!
//! PCO list bodies look like:
//!
//! ```text
//! { "data": [...], "included": [...], "meta": {...}, "links": { "next": "..." } }
//! ```

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// PCO's default page size
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Options for iterating a list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterateOptions {
    /// Offset of the first object
    pub offset: u32,
    /// Objects per page (PCO accepts 1 - 100)
    pub per_page: u32,
    /// Extra query parameters for the first request
    pub query: Vec<(String, String)>,
}

impl Default for IterateOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            per_page: DEFAULT_PER_PAGE,
            query: Vec::new(),
        }
    }
}

impl IterateOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting offset
    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// One object from a list response, with its includes attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// The resource object
    pub data: Value,
    /// Included resources referenced by this object's relationships
    pub included: Vec<Value>,
    /// `can_include` and `parent` from the page meta, when present
    pub meta: Map<String, Value>,
}

/// A decoded list page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records in server order
    pub records: Vec<Record>,
    /// Link to the next page, if any
    pub next_link: Option<String>,
}

impl Page {
    /// Decode a list body.
    ///
    /// `data` must be an array; a detail body (object `data`) or a body with
    /// no `data` at all is an `UnexpectedResponse` error.
    pub fn from_body(body: &Value) -> Result<Self> {
        let data = match body.get("data") {
            Some(Value::Array(data)) => data,
            Some(other) => {
                return Err(Error::unexpected(format!(
                    "Expected a list of objects in 'data', got {}",
                    json_kind(other)
                )))
            }
            None => return Err(Error::unexpected("Response body has no 'data' member")),
        };

        let included = body
            .get("included")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        let mut page_meta = Map::new();
        if let Some(meta) = body.get("meta") {
            for key in ["can_include", "parent"] {
                if let Some(value) = meta.get(key) {
                    page_meta.insert(key.to_string(), value.clone());
                }
            }
        }

        let records = data
            .iter()
            .map(|object| Record {
                data: object.clone(),
                included: referenced_includes(object, included),
                meta: page_meta.clone(),
            })
            .collect();

        Ok(Self {
            records,
            next_link: next_link(body),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extract `links.next`; null or empty counts as absent
pub fn next_link(body: &Value) -> Option<String> {
    body.get("links")?
        .get("next")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Included resources referenced by `object`'s relationships, in
/// relationship order then include order.
fn referenced_includes(object: &Value, included: &[Value]) -> Vec<Value> {
    let Some(relationships) = object.get("relationships").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for relationship in relationships.values() {
        let refs: Vec<&Value> = match relationship.get("data") {
            Some(Value::Object(_)) => relationship.get("data").into_iter().collect(),
            Some(Value::Array(items)) => items.iter().collect(),
            _ => continue,
        };

        for reference in refs {
            found.extend(
                included
                    .iter()
                    .filter(|include| same_resource(include, reference))
                    .cloned(),
            );
        }
    }
    found
}

fn same_resource(a: &Value, b: &Value) -> bool {
    a.get("id").is_some() && a.get("type") == b.get("type") && a.get("id") == b.get("id")
}
