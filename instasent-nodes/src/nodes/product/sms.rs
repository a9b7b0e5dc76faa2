use super::{list_request, ProductNode};
use crate::error::NodeError;
use crate::params::Parameters;
use instasent::endpoint::encode_segment;
use instasent::RequestDescriptor;
use serde_json::{json, Value};

const SMS_PATH: &str = "/channel/sms/sms";
/// Sender alias resolved upstream to the project's default sender.
const DEFAULT_SENDER: &str = "default";

/// Appends `/{term}` when the trimmed UTM term is non-empty.
fn with_utm_term(mut path: String, term: &str) -> String {
    let term = term.trim();
    if !term.is_empty() {
        path.push('/');
        path.push_str(&encode_segment(term));
    }
    path
}

impl ProductNode {
    pub(super) async fn sms(&self, operation: &str, params: &Parameters) -> Result<Value, NodeError> {
        let request = match operation {
            "get" => RequestDescriptor::get(format!(
                "{}/{}",
                SMS_PATH,
                encode_segment(&params.string("smsId")?)
            )),
            "listByAudience" => RequestDescriptor::get(format!(
                "{}/audience/{}",
                SMS_PATH,
                encode_segment(&params.string("audienceId")?)
            ))
            .with_query(list_request(params)?.to_query()),
            "listBySend" => RequestDescriptor::get(format!(
                "{}/send/{}",
                SMS_PATH,
                encode_segment(&params.string("sendId")?)
            ))
            .with_query(list_request(params)?.to_query()),
            "listByCampaign" => RequestDescriptor::get(format!(
                "{}/campaign/{}/{}",
                SMS_PATH,
                encode_segment(&params.string("campaignId")?),
                params.u64_or("optionIdx", 0)?
            ))
            .with_query(list_request(params)?.to_query()),
            "listByAutomation" => RequestDescriptor::get(format!(
                "{}/automation/{}/{}",
                SMS_PATH,
                encode_segment(&params.string("automationId")?),
                params.u64_or("messageIdx", 0)?
            ))
            .with_query(list_request(params)?.to_query()),
            "listDirect" => {
                let path = with_utm_term(
                    format!("{}/direct", SMS_PATH),
                    &params.string_or("listDirectUtmTerm", "")?,
                );
                RequestDescriptor::get(path).with_query(list_request(params)?.to_query())
            }
            "createDirect" => {
                let audience = params.string("audienceId")?;
                let text = params.string("text")?;
                let allow_unicode = params.bool_or("allowUnicode", false)?;
                let mut sender = params.string_or("senderId", DEFAULT_SENDER)?;
                if sender.trim().is_empty() {
                    sender = DEFAULT_SENDER.to_string();
                }

                let path = with_utm_term(
                    format!(
                        "{}/direct/{}/{}",
                        SMS_PATH,
                        encode_segment(&sender),
                        encode_segment(&audience)
                    ),
                    &params.string_or("utmTerm", "")?,
                );
                RequestDescriptor::post(path).with_body(json!({
                    "text": text,
                    "allowUnicode": allow_unicode,
                }))
            }
            _ => return Err(NodeError::unknown_operation("sms", operation)),
        };
        self.send_in_project(request).await
    }
}
