//! Static node descriptions: resources, operations and parameter fields.
//!
//! Hosts render their forms from these tables. Each field declares the
//! resource/operation pairs it is shown for; [`NodeDescription::fields_for`]
//! applies that rule.

use serde::Serialize;

/// Everything a host needs to render a node.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Credential schema the node authenticates with
    pub credential: &'static str,
    pub resources: &'static [ResourceSpec],
    #[serde(skip)]
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Serialize)]
pub struct ResourceSpec {
    pub value: &'static str,
    pub name: &'static str,
    pub operations: &'static [OperationSpec],
}

#[derive(Debug, Serialize)]
pub struct OperationSpec {
    pub value: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
    /// Option loader filling a dropdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options: Option<&'static str>,
    #[serde(skip)]
    pub show: Show,
}

/// Default value shown by the host form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Text(&'static str),
    Number(u64),
    Flag(bool),
}

/// Field input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Json,
    DateTime,
    Options,
    Collection,
    FixedCollection,
}

/// Display rule: the field is shown when the selected resource is listed
/// and the operation is listed (an empty operation list means any).
#[derive(Debug, Clone, Copy)]
pub struct Show {
    pub resources: &'static [&'static str],
    pub operations: &'static [&'static str],
}

impl Show {
    pub const fn on(resources: &'static [&'static str], operations: &'static [&'static str]) -> Self {
        Self {
            resources,
            operations,
        }
    }

    fn matches(&self, resource: &str, operation: &str) -> bool {
        self.resources.contains(&resource)
            && (self.operations.is_empty() || self.operations.contains(&operation))
    }
}

fn is_blank(text: &&'static str) -> bool {
    text.is_empty()
}

impl FieldSpec {
    /// Optional field without description or option loader.
    pub const fn new(
        name: &'static str,
        display_name: &'static str,
        kind: FieldKind,
        show: Show,
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            required: false,
            description: "",
            default: None,
            load_options: None,
            show,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn described(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn default_to(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn options_from(mut self, method: &'static str) -> Self {
        self.load_options = Some(method);
        self
    }
}

impl NodeDescription {
    pub fn resource(&self, value: &str) -> Option<&ResourceSpec> {
        self.resources.iter().find(|r| r.value == value)
    }

    pub fn supports(&self, resource: &str, operation: &str) -> bool {
        self.resource(resource)
            .map_or(false, |r| r.operations.iter().any(|op| op.value == operation))
    }

    /// Fields shown for one resource/operation pair, in declaration order.
    pub fn fields_for(&self, resource: &str, operation: &str) -> Vec<&FieldSpec> {
        self.fields
            .iter()
            .filter(|f| f.show.matches(resource, operation))
            .collect()
    }
}
