use super::{list_request, ProductNode};
use crate::error::NodeError;
use crate::params::Parameters;
use instasent::endpoint::encode_segment;
use instasent::{FilterSpec, QueryParams, RequestDescriptor};
use serde_json::Value;

impl ProductNode {
    pub(super) async fn segment(&self, operation: &str, params: &Parameters) -> Result<Value, NodeError> {
        let request = match operation {
            "list" => RequestDescriptor::get("/segment").with_query(list_request(params)?.to_query()),
            "listDynamic" => RequestDescriptor::get("/segment/dynamic"),
            "get" => {
                let uid = params.string("segmentUid")?;
                let mut query = QueryParams::new();
                let parameter = params.string_or("segmentParameter", "")?;
                if !parameter.is_empty() {
                    query.set("parameter", parameter);
                }
                RequestDescriptor::get(format!("/segment/{}", encode_segment(&uid))).with_query(query)
            }
            _ => return Err(NodeError::unknown_operation("segment", operation)),
        };
        self.send_in_project(request).await
    }

    /// Campaigns and automations share their list/get shape.
    pub(super) async fn campaign_or_automation(
        &self,
        resource: &str,
        operation: &str,
        params: &Parameters,
    ) -> Result<Value, NodeError> {
        let (collection, id_param) = match resource {
            "campaign" => ("/campaign", "campaignId"),
            _ => ("/automation", "automationId"),
        };

        let request = match operation {
            "list" => {
                let filters = params.object("filters")?;
                let status = filters.get("status").cloned().unwrap_or(Value::Null);
                let mut list = list_request(params)?;
                list.filters
                    .insert(0, FilterSpec::equality([("status", status)]));
                if let Some(sort) = filters.get("sort").and_then(Value::as_str) {
                    list = list.sort(sort);
                }
                RequestDescriptor::get(collection).with_query(list.to_query())
            }
            "get" => RequestDescriptor::get(format!(
                "{}/{}",
                collection,
                encode_segment(&params.string(id_param)?)
            )),
            _ => return Err(NodeError::unknown_operation(resource, operation)),
        };
        self.send_in_project(request).await
    }

    pub(super) async fn sms_sender(&self, operation: &str, params: &Parameters) -> Result<Value, NodeError> {
        match operation {
            "list" => {
                let request = RequestDescriptor::get("/channel/sms/sender")
                    .with_query(list_request(params)?.to_query());
                self.send_in_project(request).await
            }
            _ => Err(NodeError::unknown_operation("smsSender", operation)),
        }
    }
}
