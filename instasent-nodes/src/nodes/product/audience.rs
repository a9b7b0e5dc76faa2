use super::ProductNode;
use crate::error::NodeError;
use crate::params::Parameters;
use instasent::endpoint::encode_segment;
use instasent::{FilterRequest, FilterSpec, QueryParams, RequestDescriptor};
use serde_json::{json, Value};

/// Upper bound for `limit` on search endpoints.
const SEARCH_LIMIT_MAX: u64 = 50;
/// Upper bound for `limit` on scroll endpoints.
const SCROLL_LIMIT_MAX: u64 = 100;

/// Search or scroll body: the raw QueryFilter with `limit` (clamped to
/// `max`, defaulting to it) and, for scrolls, a non-empty `cursor` layered
/// on top.
fn query_body(params: &Parameters, max: u64, scroll: bool) -> Result<Value, NodeError> {
    let limit = params.u64_or("limit", max)?.min(max);
    let mut request = FilterRequest::new()
        .filter(FilterSpec::raw(params.json_text("queryFilterJson", "{}")))
        .limit(limit);
    if scroll {
        request = request.cursor(params.string_or("cursor", "")?);
    }
    Ok(Value::Object(request.to_body()))
}

fn sync_query(params: &Parameters) -> Result<QueryParams, NodeError> {
    let mut query = QueryParams::new();
    if params.bool_or("sync", false)? {
        query.set("_sync", "true");
    }
    Ok(query)
}

/// `{audienceId}` plus unsubscribe details that are set.
fn stream_body(params: &Parameters, unsubscribe: bool) -> Result<Value, NodeError> {
    let mut body = json!({ "audienceId": params.string("streamAudienceId")? });
    if unsubscribe {
        for (param, key) in [
            ("reason", "reason"),
            ("utmSource", "utm-source"),
            ("utmMedium", "utm-medium"),
            ("utmCampaign", "utm-campaign"),
        ] {
            let value = params.string_or(param, "")?;
            if !value.is_empty() {
                body[key] = Value::String(value);
            }
        }
    }
    Ok(body)
}

impl ProductNode {
    pub(super) async fn audience(&self, operation: &str, params: &Parameters) -> Result<Value, NodeError> {
        let request = match operation {
            "get" => RequestDescriptor::get(format!(
                "/audience/user/{}",
                encode_segment(&params.string("userId")?)
            )),
            "getById" => RequestDescriptor::get(format!(
                "/audience/{}",
                encode_segment(&params.string("audienceId")?)
            )),
            "searchByPhone" => RequestDescriptor::get(format!(
                "/audience/search/phone/{}",
                encode_segment(&params.string("userPhone")?)
            )),
            "searchByEmail" => RequestDescriptor::get(format!(
                "/audience/search/email/{}",
                encode_segment(&params.string("userEmail")?)
            )),
            "getEvents" => RequestDescriptor::get(format!(
                "/audience/{}/events",
                encode_segment(&params.string("audienceId")?)
            )),
            "search" => RequestDescriptor::post("/audience/search")
                .with_body(query_body(params, SEARCH_LIMIT_MAX, false)?),
            "scroll" => RequestDescriptor::post("/audience/scroll")
                .with_body(query_body(params, SCROLL_LIMIT_MAX, true)?),
            "scrollBySegment" => {
                let segment = params.string("segmentUid")?;
                let mut query = QueryParams::new();
                let parameter = params.string_or("segmentParameter", "")?;
                if !parameter.is_empty() {
                    query.set("parameter", parameter);
                }
                RequestDescriptor::post(format!("/audience/segment/{}/scroll", encode_segment(&segment)))
                    .with_body(query_body(params, SCROLL_LIMIT_MAX, true)?)
                    .with_query(query)
            }
            "searchEvents" => RequestDescriptor::post("/event/search")
                .with_body(query_body(params, SEARCH_LIMIT_MAX, false)?),
            "scrollEvents" => RequestDescriptor::post("/event/scroll")
                .with_body(query_body(params, SCROLL_LIMIT_MAX, true)?),
            "sms-subscribe" | "email-subscribe" | "delete-contact" => {
                RequestDescriptor::post(format!("/audience/stream/{}", operation))
                    .with_body(stream_body(params, false)?)
                    .with_query(sync_query(params)?)
            }
            "sms-unsubscribe" | "email-unsubscribe" => {
                RequestDescriptor::post(format!("/audience/stream/{}", operation))
                    .with_body(stream_body(params, true)?)
                    .with_query(sync_query(params)?)
            }
            _ => return Err(NodeError::unknown_operation("audience", operation)),
        };
        self.send_in_project(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{node, params};
    use super::*;
    use crate::Node;
    use mockito::{Matcher, Server};

    #[test]
    fn test_query_body_clamps_and_overrides() {
        let p = params(json!({
            "queryFilterJson": "{\"root\":{\"type\":\"group\",\"join\":\"and\",\"children\":[]},\"limit\":10,\"cursor\":\"old\"}",
            "limit": 500,
            "cursor": "c-2"
        }));
        let body = query_body(&p, SCROLL_LIMIT_MAX, true).unwrap();
        assert_eq!(body["limit"], 100);
        assert_eq!(body["cursor"], "c-2");
        assert_eq!(body["root"]["join"], "and");

        let body = query_body(&p, SEARCH_LIMIT_MAX, false).unwrap();
        assert_eq!(body["limit"], 50);
        assert_eq!(body["cursor"], "old");
    }

    #[test]
    fn test_query_body_defaults() {
        let body = query_body(&Parameters::new(), SCROLL_LIMIT_MAX, true).unwrap();
        assert_eq!(body, json!({"limit": 100}));

        let body = query_body(&params(json!({"queryFilterJson": "not json"})), SEARCH_LIMIT_MAX, false)
            .unwrap();
        assert_eq!(body, json!({"limit": 50}));
    }

    #[test]
    fn test_stream_body_skips_blank_details() {
        let p = params(json!({
            "streamAudienceId": "42",
            "reason": "too many",
            "utmSource": "",
            "utmCampaign": "spring"
        }));
        assert_eq!(
            stream_body(&p, true).unwrap(),
            json!({"audienceId": "42", "reason": "too many", "utm-campaign": "spring"})
        );
        assert_eq!(stream_body(&p, false).unwrap(), json!({"audienceId": "42"}));
    }

    #[tokio::test]
    async fn test_search_by_email_encodes_value() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/project/uid-1/audience/search/email/a%40b.com")
            .with_status(200)
            .with_body(r#"{"entities":[]}"#)
            .create_async()
            .await;

        node(&server)
            .execute("audience", "searchByEmail", &params(json!({"userEmail": "a@b.com"})))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_scroll_by_segment_sends_parameter() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/uid-1/audience/segment/seg-1/scroll")
            .match_query(Matcher::UrlEncoded("parameter".into(), "2026".into()))
            .match_body(Matcher::Json(json!({"limit": 20, "cursor": "c1"})))
            .with_status(200)
            .with_body(r#"{"entities":[],"cursor":null}"#)
            .create_async()
            .await;

        node(&server)
            .execute(
                "audience",
                "scrollBySegment",
                &params(json!({
                    "segmentUid": "seg-1",
                    "segmentParameter": "2026",
                    "limit": 20,
                    "cursor": "c1"
                })),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsubscribe_with_sync() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/uid-1/audience/stream/email-unsubscribe")
            .match_query(Matcher::UrlEncoded("_sync".into(), "true".into()))
            .match_body(Matcher::Json(json!({"audienceId": "42", "utm-medium": "sms"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        node(&server)
            .execute(
                "audience",
                "email-unsubscribe",
                &params(json!({"streamAudienceId": "42", "utmMedium": "sms", "sync": true})),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_subscribe_without_sync_has_no_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/uid-1/audience/stream/sms-subscribe")
            .match_body(Matcher::Json(json!({"audienceId": "42"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        node(&server)
            .execute("audience", "sms-subscribe", &params(json!({"streamAudienceId": "42"})))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_events_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/uid-1/event/search")
            .match_body(Matcher::Json(json!({
                "root": {"type": "group", "join": "or", "children": []},
                "limit": 50
            })))
            .with_status(200)
            .with_body(r#"{"entities":[]}"#)
            .create_async()
            .await;

        node(&server)
            .execute(
                "audience",
                "searchEvents",
                &params(json!({
                    "queryFilterJson": {"root": {"type": "group", "join": "or", "children": []}}
                })),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
