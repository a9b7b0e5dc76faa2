//! Dropdown option loading.
//!
//! Both nodes expose the same three spec lookups (attributes, event types,
//! event parameters) against different endpoints: the data source stream
//! specs under `specs`, and the project-wide specs under `entities`.
//! [`SpecCatalog`] is the capability; [`HttpSpecCatalog`] is the single
//! implementation, parameterized by [`SpecEndpoints`].

use crate::error::NodeError;
use async_trait::async_trait;
use instasent::endpoint::encode_segment;
use instasent::{BearerCredentials, Executor, RequestDescriptor};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Reverse;
use tracing::debug;

const DATE_HINT: &str = " (ISO 8601 format YYYY-MM-DD)";

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionEntry {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Contact attribute definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_label: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub data_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub required_in_webhook: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub read_only: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub visible: bool,
}

/// Event type definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub emoji: String,
}

/// Event parameter definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventParameterSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub parameter: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub required: bool,
}

/// Attribute options: required first, then visible, otherwise in API
/// order. Read-only attributes and `_user_id` are not offered.
pub fn attribute_options(mut specs: Vec<AttributeSpec>) -> Vec<OptionEntry> {
    specs.sort_by_key(|s| (Reverse(s.required_in_webhook), Reverse(s.visible)));

    specs
        .into_iter()
        .filter(|s| !s.read_only && s.uid != "_user_id")
        .map(|spec| {
            let mut description = spec.description.unwrap_or_default();
            if spec.data_type == "date" {
                description.push_str(DATE_HINT);
            }
            description.push_str(&format!(" [{}]", spec.uid));

            let (name, description) = if spec.required_in_webhook {
                (
                    format!("{} *", spec.display_label),
                    format!("[Required] {}", description),
                )
            } else {
                (spec.display_label, description)
            };
            OptionEntry::new(name, spec.uid).described(description)
        })
        .collect()
}

pub fn event_type_options(specs: Vec<EventSpec>) -> Vec<OptionEntry> {
    specs
        .into_iter()
        .map(|spec| OptionEntry::new(format!("{} {}", spec.emoji, spec.name), spec.uid))
        .collect()
}

pub fn event_parameter_options(specs: Vec<EventParameterSpec>) -> Vec<OptionEntry> {
    specs
        .into_iter()
        .map(|spec| {
            let mut description = String::new();
            if spec.required {
                description.push_str("[Required] ");
            }
            description.push_str(&spec.description);
            if spec.data_type == "date" {
                description.push_str(DATE_HINT);
            }
            let name = if spec.required {
                format!("{} *", spec.title)
            } else {
                spec.title
            };
            OptionEntry::new(name, spec.parameter).described(description)
        })
        .collect()
}

/// Reads the list stored under `key`; a missing or null list is empty.
pub fn extract_list<T: DeserializeOwned>(response: &Value, key: &str) -> Result<Vec<T>, NodeError> {
    match response.get(key) {
        None | Some(Value::Null) => {
            debug!(key = key, "Response carries no list, treating as empty");
            Ok(Vec::new())
        }
        Some(list) => serde_json::from_value(list.clone())
            .map_err(|e| NodeError::InvalidResponse(format!("'{}': {}", key, e))),
    }
}

/// Accepts an identifier sent either as a string or as a number.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}

/// Reads an explicit `null` as the type's default, like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lookup of attribute, event type and event parameter definitions.
#[async_trait]
pub trait SpecCatalog: Send + Sync {
    async fn list_attributes(&self) -> Result<Vec<OptionEntry>, NodeError>;
    async fn list_event_types(&self) -> Result<Vec<OptionEntry>, NodeError>;
    async fn list_event_parameters(&self, event_type: &str) -> Result<Vec<OptionEntry>, NodeError>;
}

/// Where a catalog reads its specs from.
#[derive(Debug, Clone)]
pub struct SpecEndpoints {
    pub attributes: String,
    pub event_types: String,
    /// Prefix; the event type is appended as a path segment
    pub event_parameters: String,
    /// Response key holding the list (`specs` or `entities`)
    pub list_key: &'static str,
}

impl SpecEndpoints {
    /// Stream specs of one data source, rooted at `datasource_path`.
    pub fn stream(datasource_path: &str) -> Self {
        Self {
            attributes: format!("{}/stream/specs/attributes", datasource_path),
            event_types: format!("{}/stream/specs/events", datasource_path),
            event_parameters: format!("{}/stream/specs/event-parameters", datasource_path),
            list_key: "specs",
        }
    }

    /// Project-wide specs, rooted at `project_path`.
    pub fn project(project_path: &str) -> Self {
        Self {
            attributes: format!("{}/specs/attributes", project_path),
            event_types: format!("{}/specs/events", project_path),
            event_parameters: format!("{}/specs/events", project_path),
            list_key: "entities",
        }
    }
}

/// [`SpecCatalog`] backed by the REST API.
pub struct HttpSpecCatalog<'a> {
    executor: &'a Executor,
    credentials: &'a dyn BearerCredentials,
    endpoints: SpecEndpoints,
}

impl<'a> HttpSpecCatalog<'a> {
    pub fn new(
        executor: &'a Executor,
        credentials: &'a dyn BearerCredentials,
        endpoints: SpecEndpoints,
    ) -> Self {
        Self {
            executor,
            credentials,
            endpoints,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: String) -> Result<Vec<T>, NodeError> {
        let response = self
            .executor
            .execute(self.credentials, &RequestDescriptor::get(path))
            .await?;
        extract_list(&response, self.endpoints.list_key)
    }
}

#[async_trait]
impl SpecCatalog for HttpSpecCatalog<'_> {
    async fn list_attributes(&self) -> Result<Vec<OptionEntry>, NodeError> {
        let specs = self.fetch(self.endpoints.attributes.clone()).await?;
        Ok(attribute_options(specs))
    }

    async fn list_event_types(&self) -> Result<Vec<OptionEntry>, NodeError> {
        let specs = self.fetch(self.endpoints.event_types.clone()).await?;
        Ok(event_type_options(specs))
    }

    async fn list_event_parameters(&self, event_type: &str) -> Result<Vec<OptionEntry>, NodeError> {
        let path = format!(
            "{}/{}",
            self.endpoints.event_parameters,
            encode_segment(event_type)
        );
        let specs = self.fetch(path).await?;
        Ok(event_parameter_options(specs))
    }
}
