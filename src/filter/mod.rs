//! Query-filter builder.
//!
//! Turns caller-supplied filter fragments into the two shapes the upstream
//! API understands:
//!
//! - **Query strings** for list endpoints, using reserved keys: `_start`,
//!   `_limit`, `_sort`, `_q` (a serialized filter tree) and
//!   `<field>_<operator>` equality filters.
//! - **JSON bodies** for search/scroll endpoints: the QueryFilter object with
//!   `limit` / `cursor` merged in.
//!
//! The caller picks the target ([`FilterRequest::to_query`] or
//! [`FilterRequest::to_body`]); building is pure data transformation.
//!
//! Malformed raw JSON never fails a call: it degrades to "no filter".
//! Pagination values given to the builder always override those embedded in
//! a filter.

mod tree;

pub use tree::{FilterNode, Join, QueryFilter};

use crate::request::QueryParams;
use serde_json::{Map, Value};
use tracing::debug;

/// Operator appended to equality filters that don't name one.
pub const DEFAULT_OPERATOR: &str = "eq";

/// One filter fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterSpec {
    /// Field → scalar filters (`status` → `status_eq`).
    Equality(Map<String, Value>),
    /// A typed condition tree.
    Tree(QueryFilter),
    /// Raw JSON passed through verbatim.
    Raw(String),
}

impl FilterSpec {
    pub fn equality<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        FilterSpec::Equality(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn raw(json: impl Into<String>) -> Self {
        FilterSpec::Raw(json.into())
    }

    /// JSON value of a tree or raw filter.
    ///
    /// Returns `None` for blank or `{}` raw input and for raw input that
    /// does not parse. Equality filters have no single JSON value.
    fn to_value(&self) -> Option<Value> {
        match self {
            FilterSpec::Equality(_) => None,
            FilterSpec::Tree(tree) => serde_json::to_value(tree).ok(),
            FilterSpec::Raw(json) => parse_raw(json),
        }
    }
}

fn parse_raw(json: &str) -> Option<Value> {
    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "{}" {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed filter JSON");
            None
        }
    }
}

/// Filters plus pagination for one call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterRequest {
    pub filters: Vec<FilterSpec>,
    pub limit: Option<u64>,
    pub cursor: Option<String>,
    pub start: Option<u64>,
    pub sort: Option<String>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Scroll cursor; an empty cursor means "first page" and is not sent.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Sort spec such as `name:asc`.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Builds a search/scroll request body.
    ///
    /// Filters are merged in order (later keys win), then `limit` and
    /// `cursor` overwrite whatever the filters carried.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();

        for spec in &self.filters {
            match spec {
                FilterSpec::Equality(pairs) => {
                    for (field, value) in pairs {
                        if !is_blank(value) {
                            body.insert(field.clone(), value.clone());
                        }
                    }
                }
                _ => match spec.to_value() {
                    Some(Value::Object(object)) => body.extend(object),
                    Some(_) => debug!("Ignoring filter JSON that is not an object"),
                    None => {}
                },
            }
        }

        if let Some(limit) = self.limit {
            body.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(cursor) = self.cursor.as_deref().filter(|c| !c.is_empty()) {
            body.insert("cursor".to_string(), Value::from(cursor));
        }

        body
    }

    /// Builds list-endpoint query parameters.
    ///
    /// `_start` is only sent together with `_limit` and defaults to 0.
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();

        if let Some(limit) = self.limit {
            query.set("_start", self.start.unwrap_or(0).to_string());
            query.set("_limit", limit.to_string());
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            query.set("_sort", sort);
        }

        for spec in &self.filters {
            match spec {
                FilterSpec::Equality(pairs) => {
                    for (field, value) in pairs {
                        if let Some(value) = query_value(value) {
                            query.set(equality_key(field), value);
                        }
                    }
                }
                _ => {
                    if let Some(value) = spec.to_value().filter(is_non_empty_filter) {
                        query.set("_q", value.to_string());
                    }
                }
            }
        }

        query
    }
}

/// `status` → `status_eq`; names that already carry an operator
/// (`status_neq`) are kept.
pub fn equality_key(field: &str) -> String {
    if field.contains('_') {
        field.to_string()
    } else {
        format!("{}_{}", field, DEFAULT_OPERATOR)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn is_non_empty_filter(value: &Value) -> bool {
    match value {
        Value::Object(object) => !object.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}
