// Integration tests: filter builder + endpoint resolver + executor together

use instasent::credentials::{IngestCredentials, ProductCredentials};
use instasent::endpoint::{encode_segment, resolve};
use instasent::filter::{FilterNode, FilterRequest, FilterSpec, QueryFilter};
use instasent::{Executor, RequestDescriptor};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_scroll_request_end_to_end() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/project/uid-1/audience/scroll")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(json!({
            "root": {
                "type": "group",
                "join": "and",
                "children": [{
                    "type": "attribute_condition",
                    "key": "_email",
                    "operator": "exists",
                    "values": []
                }]
            },
            "sortField": "_date_updated",
            "sortAsc": false,
            "limit": 100,
            "cursor": "c-2"
        })))
        .with_status(200)
        .with_body(r#"{"entities":[{"_user_id":"u1"}],"cursor":"c-3"}"#)
        .create_async()
        .await;

    let credentials = ProductCredentials::new("tok", "uid-1");
    let filter = QueryFilter::new(FilterNode::and(vec![FilterNode::attribute(
        "_email",
        "exists",
        vec![],
    )]))
    .sorted_by("_date_updated", false)
    .with("limit", json!(10));

    let body = FilterRequest::new()
        .filter(FilterSpec::Tree(filter))
        .limit(100)
        .cursor("c-2")
        .to_body();
    let request = RequestDescriptor::post(format!("{}/audience/scroll", credentials.project_path()))
        .with_body(body.into());

    let executor = Executor::with_base_url(server.url());
    let response = executor.execute(&credentials, &request).await.unwrap();

    assert_eq!(response["cursor"], "c-3");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_request_query_string() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/project/uid-1/campaign")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("_start".into(), "0".into()),
            Matcher::UrlEncoded("_limit".into(), "50".into()),
            Matcher::UrlEncoded("status_eq".into(), "sent".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"entities":[]}"#)
        .create_async()
        .await;

    let credentials = ProductCredentials::new("tok", "uid-1");
    let query = FilterRequest::new()
        .filter(FilterSpec::equality([("status", json!("sent"))]))
        .limit(50)
        .to_query();
    let request =
        RequestDescriptor::get(format!("{}/campaign", credentials.project_path())).with_query(query);

    Executor::with_base_url(server.url())
        .execute(&credentials, &request)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_event_id_passed_through_on_resubmission() {
    let mut server = Server::new_async().await;
    let event = json!([{
        "_user_id": "u1",
        "_event_id": "evt-1",
        "_event_type": "purchase",
        "_event_date": "2026-01-01T00:00:00.000Z",
        "_event_parameters": {"amount": "10"}
    }]);
    let mock = server
        .mock("POST", "/project/p/datasource/ds1/stream/events")
        .match_body(Matcher::Json(event.clone()))
        .with_status(200)
        .with_body(r#"{"accepted":1}"#)
        .expect(2)
        .create_async()
        .await;

    let credentials = IngestCredentials::new("p", "ds1", "t");
    let executor = Executor::with_base_url(server.url());
    let request = RequestDescriptor::post(format!("{}/stream/events", credentials.datasource_path()))
        .with_body(event);

    executor.execute(&credentials, &request).await.unwrap();
    executor.execute(&credentials, &request).await.unwrap();
    mock.assert_async().await;
}

#[test]
fn test_resolved_urls_for_both_surfaces() {
    assert_eq!(
        resolve("https://api.instasent.com/v1", "p", Some("")),
        "https://api.instasent.com/v1/project/p/datasource/dsapi"
    );
    assert_eq!(
        resolve("https://api.instasent.com/v1", "uid-1", None),
        "https://api.instasent.com/v1/project/uid-1"
    );
    assert_eq!(
        format!("/audience/search/email/{}", encode_segment("a@b.com")),
        "/audience/search/email/a%40b.com"
    );
}
