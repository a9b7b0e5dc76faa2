use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Boolean operator joining the children of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    And,
    Or,
}

/// One node of an upstream QueryFilter condition tree.
///
/// Operator names (`exists`, `matches-string`, `in`, ...) are not validated
/// here; the upstream API owns their semantics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterNode {
    Group {
        join: Join,
        children: Vec<FilterNode>,
    },
    AttributeCondition {
        key: String,
        operator: String,
        #[serde(default)]
        values: Vec<Value>,
    },
    EventCondition {
        key: String,
        operator: String,
        #[serde(default)]
        values: Vec<Value>,
    },
}

impl FilterNode {
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            join: Join::And,
            children,
        }
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            join: Join::Or,
            children,
        }
    }

    /// Condition on a contact attribute (audience queries).
    pub fn attribute(key: impl Into<String>, operator: impl Into<String>, values: Vec<Value>) -> Self {
        FilterNode::AttributeCondition {
            key: key.into(),
            operator: operator.into(),
            values,
        }
    }

    /// Condition on an event field (event queries).
    pub fn event(key: impl Into<String>, operator: impl Into<String>, values: Vec<Value>) -> Self {
        FilterNode::EventCondition {
            key: key.into(),
            operator: operator.into(),
            values,
        }
    }
}

/// A complete QueryFilter as accepted by the search and scroll endpoints.
///
/// Properties other than `root`, `sortField` and `sortAsc` are kept in
/// `extra` and serialized back unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    pub root: FilterNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_asc: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryFilter {
    pub fn new(root: FilterNode) -> Self {
        Self {
            root,
            sort_field: None,
            sort_asc: None,
            extra: Map::new(),
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_field = Some(field.into());
        self.sort_asc = Some(ascending);
        self
    }

    /// Adds a pass-through property.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
