use super::ProductNode;
use crate::error::NodeError;
use crate::nodes::stream::{contact_payload, event_payload, stream_flags};
use crate::params::Parameters;
use instasent::endpoint::{encode_segment, resolve_datasource_id};
use instasent::{QueryParams, RequestDescriptor};
use serde_json::Value;

/// Spec kinds accepted by `getStreamSpecs`.
const SPEC_TYPES: &[&str] = &["attributes", "events", "event-parameters"];

/// `/datasource/{id}` relative to the project, with the blank-id default
/// applied.
pub(super) fn datasource_scope(params: &Parameters) -> Result<String, NodeError> {
    let datasource_id = params.string_or("datasourceId", "")?;
    Ok(format!(
        "/datasource/{}",
        encode_segment(resolve_datasource_id(&datasource_id))
    ))
}

impl ProductNode {
    pub(super) async fn datasource_stream(
        &self,
        operation: &str,
        params: &Parameters,
    ) -> Result<Value, NodeError> {
        let scope = datasource_scope(params)?;
        let request = match operation {
            "getStream" => RequestDescriptor::get(format!("{}/stream", scope)),
            "getStreamSpecs" => {
                let spec_type = params.string("specType")?;
                if !SPEC_TYPES.contains(&spec_type.as_str()) {
                    return Err(NodeError::invalid(
                        "specType",
                        format!("expected one of {}", SPEC_TYPES.join(", ")),
                    ));
                }
                let mut path = format!("{}/stream/specs/{}", scope, spec_type);
                if spec_type == "event-parameters" {
                    let event_type = params.string_or("specEventType", "")?;
                    if !event_type.is_empty() {
                        path.push('/');
                        path.push_str(&encode_segment(&event_type));
                    }
                }
                RequestDescriptor::get(path)
            }
            "getStats" => RequestDescriptor::get(format!("{}/stats", scope)),
            "getContact" => RequestDescriptor::get(format!(
                "{}/stream/contacts/{}",
                scope,
                encode_segment(&params.string("userId")?)
            )),
            "deleteContact" => RequestDescriptor::delete(format!(
                "{}/stream/contacts/{}",
                scope,
                encode_segment(&params.string("userId")?)
            )),
            "pushContacts" => {
                let body = contact_payload(&params.string("contactUserId")?, params)?;
                RequestDescriptor::post(format!("{}/stream/contacts", scope))
                    .with_body(body)
                    .with_query(push_flags(params)?)
            }
            "pushEvents" => {
                let body = event_payload(
                    &params.string("eventUserId")?,
                    &params.string("eventId")?,
                    &params.string("eventType")?,
                    &params.string_or("eventDate", "")?,
                    params,
                )?;
                RequestDescriptor::post(format!("{}/stream/events", scope))
                    .with_body(body)
                    .with_query(push_flags(params)?)
            }
            _ => return Err(NodeError::unknown_operation("datasourceStream", operation)),
        };
        self.send_in_project(request).await
    }
}

fn push_flags(params: &Parameters) -> Result<QueryParams, NodeError> {
    Ok(stream_flags(
        params.bool_or("sync", false)?,
        params.bool_or("dryRun", false)?,
    ))
}
