//! Request descriptors: everything needed to issue one upstream call.

use crate::endpoint::join_url;
use reqwest::Method;
use serde_json::Value;

/// Query string of an upstream request.
///
/// Holds ordinary `key=value` pairs plus bare flags (`?_sync`) that some
/// stream endpoints expect without a value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
    flags: Vec<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key=value`, replacing an existing pair with the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Appends a bare flag (no `=value`). Duplicates are ignored.
    pub fn flag(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.flags.contains(&name) {
            self.flags.push(name);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.flags.is_empty()
    }

    /// Encodes the parameters as a query string (without the leading `?`).
    ///
    /// Pairs come first, in insertion order, followed by flags.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if !self.pairs.is_empty() {
            // Encoding a Vec of string pairs cannot fail.
            if let Ok(encoded) = serde_urlencoded::to_string(&self.pairs) {
                parts.push(encoded);
            }
        }
        parts.extend(self.flags.iter().map(|f| urlencoding::encode(f).into_owned()));
        parts.join("&")
    }
}

/// One upstream call: method, path relative to the API base, optional JSON
/// body and query string.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: QueryParams,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Full URL against the given API base.
    pub fn url(&self, api_base: &str) -> String {
        let url = join_url(api_base, &self.path);
        if self.query.is_empty() {
            url
        } else {
            format!("{}?{}", url, self.query.to_query_string())
        }
    }
}
