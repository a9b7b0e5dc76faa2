//! Typed access to the raw parameter map a host hands to a node.

use crate::error::NodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for one item of a batch.
///
/// Hosts send parameters as a flat JSON object keyed by field name
/// (`userId`, `limit`, `contactProperties`, ...). Getters either apply a
/// default or fail with [`NodeError`] before any request is built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Required string. Numbers are accepted and rendered as text; blank
    /// strings count as missing.
    pub fn string(&self, name: &str) -> Result<String, NodeError> {
        match self.optional_string(name)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(NodeError::MissingParameter(name.to_string())),
        }
    }

    /// String with a default for absent values. An explicit empty string is
    /// returned as-is.
    pub fn string_or(&self, name: &str, default: &str) -> Result<String, NodeError> {
        Ok(self
            .optional_string(name)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, NodeError> {
        match self.raw(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(NodeError::invalid(name, "expected a string")),
        }
    }

    /// Boolean; `"true"` / `"false"` strings are accepted.
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, NodeError> {
        match self.raw(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(NodeError::invalid(name, "expected a boolean")),
            },
            Some(_) => Err(NodeError::invalid(name, "expected a boolean")),
        }
    }

    /// Non-negative integer; numeric strings are accepted.
    pub fn u64_or(&self, name: &str, default: u64) -> Result<u64, NodeError> {
        let invalid = || NodeError::invalid(name, "expected a non-negative integer");
        match self.raw(name) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                        .map(|f| f as u64)
                })
                .ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    /// JSON text of a field that may hold either a JSON string or an inline
    /// object/array. Absent values yield `default`.
    pub fn json_text(&self, name: &str, default: &str) -> String {
        match self.raw(name) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Nested object (a "collection" field). Absent means empty.
    pub fn object(&self, name: &str) -> Result<Map<String, Value>, NodeError> {
        match self.raw(name) {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(NodeError::invalid(name, "expected an object")),
        }
    }

    /// Entries of a repeatable group, e.g. `contactProperties.property`.
    ///
    /// The group may be absent, or hold a single object instead of a list.
    pub fn entries(&self, name: &str, group: &str) -> Result<Vec<Map<String, Value>>, NodeError> {
        let outer = self.object(name)?;
        match outer.get(group) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(entry) => Ok(entry.clone()),
                    _ => Err(NodeError::invalid(
                        format!("{}.{}", name, group),
                        "expected a list of objects",
                    )),
                })
                .collect(),
            Some(Value::Object(entry)) => Ok(vec![entry.clone()]),
            Some(_) => Err(NodeError::invalid(
                format!("{}.{}", name, group),
                "expected a list of objects",
            )),
        }
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_required_string() {
        let p = params(json!({"userId": "u1", "blank": "  ", "num": 42}));
        assert_eq!(p.string("userId").unwrap(), "u1");
        assert_eq!(p.string("num").unwrap(), "42");
        assert_eq!(
            p.string("blank").unwrap_err(),
            NodeError::MissingParameter("blank".into())
        );
        assert_eq!(
            p.string("absent").unwrap_err(),
            NodeError::MissingParameter("absent".into())
        );
    }

    #[test]
    fn test_string_with_default() {
        let p = params(json!({"datasourceId": "", "nulled": null}));
        assert_eq!(p.string_or("datasourceId", "x").unwrap(), "");
        assert_eq!(p.string_or("nulled", "x").unwrap(), "x");
        assert!(p.string_or("datasourceId", "x").is_ok());
        assert!(params(json!({"a": [1]})).string_or("a", "").is_err());
    }

    #[test]
    fn test_bool_and_integer_coercion() {
        let p = params(json!({"sync": "true", "dry": false, "limit": "25", "neg": -1, "f": 10.0}));
        assert!(p.bool_or("sync", false).unwrap());
        assert!(!p.bool_or("dry", true).unwrap());
        assert!(p.bool_or("absent", true).unwrap());
        assert_eq!(p.u64_or("limit", 50).unwrap(), 25);
        assert_eq!(p.u64_or("f", 50).unwrap(), 10);
        assert_eq!(p.u64_or("absent", 50).unwrap(), 50);
        assert!(matches!(
            p.u64_or("neg", 50),
            Err(NodeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_json_text_accepts_inline_objects() {
        let p = params(json!({"a": "{\"x\":1}", "b": {"x": 1}}));
        assert_eq!(p.json_text("a", "{}"), r#"{"x":1}"#);
        assert_eq!(p.json_text("b", "{}"), r#"{"x":1}"#);
        assert_eq!(p.json_text("c", "{}"), "{}");
    }

    #[test]
    fn test_repeatable_entries() {
        let p = params(json!({
            "contactProperties": {"property": [
                {"field": "email", "value": "a@b.com"},
                {"field": "first_name", "value": "Ana"}
            ]},
            "single": {"property": {"field": "x", "value": "y"}},
            "bad": {"property": [1]}
        }));
        let entries = p.entries("contactProperties", "property").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["value"], "Ana");
        assert_eq!(p.entries("single", "property").unwrap().len(), 1);
        assert!(p.entries("absent", "property").unwrap().is_empty());
        assert!(p.entries("bad", "property").is_err());
    }
}
