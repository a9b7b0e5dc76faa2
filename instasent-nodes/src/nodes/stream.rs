//! Contact and event payloads for the data source stream endpoints.
//!
//! Used by the ingest node and by the product node's `datasourceStream`
//! resource, which push the same record shapes.

use crate::error::NodeError;
use crate::params::Parameters;
use chrono::{SecondsFormat, Utc};
use instasent::QueryParams;
use serde_json::{json, Map, Value};

/// `[{ "_user_id": .., <field>: <value>, .. }]` from a `contactProperties`
/// collection. Later duplicates of a field win.
pub fn contact_payload(user_id: &str, params: &Parameters) -> Result<Value, NodeError> {
    let mut contact = Map::new();
    contact.insert("_user_id".to_string(), Value::from(user_id));

    for property in params.entries("contactProperties", "property")? {
        let Some(field) = property.get("field").and_then(Value::as_str) else {
            continue;
        };
        let value = property.get("value").cloned().unwrap_or(Value::Null);
        contact.insert(field.to_string(), value);
    }

    Ok(Value::Array(vec![Value::Object(contact)]))
}

/// `[{ "_user_id", "_event_id", "_event_type", "_event_date",
/// "_event_parameters" }]`.
///
/// `_event_id` is forwarded untouched; the API deduplicates on it. A blank
/// date becomes the current UTC time in RFC 3339 with milliseconds.
pub fn event_payload(
    user_id: &str,
    event_id: &str,
    event_type: &str,
    event_date: &str,
    params: &Parameters,
) -> Result<Value, NodeError> {
    let mut parameters = Map::new();
    for parameter in params.entries("eventParameters", "parameters")? {
        let Some(name) = parameter.get("name").and_then(Value::as_str) else {
            continue;
        };
        let value = parameter.get("value").cloned().unwrap_or(Value::Null);
        parameters.insert(name.to_string(), value);
    }

    let event_date = if event_date.trim().is_empty() {
        now_timestamp()
    } else {
        event_date.to_string()
    };

    Ok(json!([{
        "_user_id": user_id,
        "_event_id": event_id,
        "_event_type": event_type,
        "_event_date": event_date,
        "_event_parameters": parameters,
    }]))
}

/// Valueless `_sync` / `_dryRun` flags, in that order.
pub fn stream_flags(sync: bool, dry_run: bool) -> QueryParams {
    let mut query = QueryParams::new();
    if sync {
        query.flag("_sync");
    }
    if dry_run {
        query.flag("_dryRun");
    }
    query
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
