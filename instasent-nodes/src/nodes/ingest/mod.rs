//! Data source (ingest) node: pushes contacts and events into one data
//! source stream.

mod description;

pub use description::DESCRIPTION;

use super::stream::{contact_payload, event_payload, stream_flags};
use crate::error::NodeError;
use crate::fields::NodeDescription;
use crate::options::{HttpSpecCatalog, OptionEntry, SpecCatalog, SpecEndpoints};
use crate::params::Parameters;
use crate::Node;
use async_trait::async_trait;
use instasent::endpoint::encode_segment;
use instasent::{Executor, IngestCredentials, RequestDescriptor};
use serde_json::Value;
use tracing::debug;

/// Ingest node bound to one data source.
pub struct IngestNode {
    executor: Executor,
    credentials: IngestCredentials,
}

impl IngestNode {
    pub fn new(executor: Executor, credentials: IngestCredentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    fn catalog(&self) -> HttpSpecCatalog<'_> {
        HttpSpecCatalog::new(
            &self.executor,
            &self.credentials,
            SpecEndpoints::stream(&self.credentials.datasource_path()),
        )
    }

    async fn send(&self, request: RequestDescriptor) -> Result<Value, NodeError> {
        Ok(self.executor.execute(&self.credentials, &request).await?)
    }

    async fn upsert_contact(&self, params: &Parameters) -> Result<Value, NodeError> {
        let user_id = params.string("userId")?;
        let instant = params.bool_or("instant", false)?;
        let body = contact_payload(&user_id, params)?;

        let request = RequestDescriptor::post(self.stream_path("/contacts"))
            .with_body(body)
            .with_query(stream_flags(instant, false));
        self.send(request).await
    }

    async fn delete_contact(&self, params: &Parameters) -> Result<Value, NodeError> {
        let user_id = params.string("userId")?;
        let path = self.stream_path(&format!("/contacts/{}", encode_segment(&user_id)));
        self.send(RequestDescriptor::delete(path)).await
    }

    async fn create_event(&self, params: &Parameters) -> Result<Value, NodeError> {
        let body = event_payload(
            &params.string("userId")?,
            &params.string("eventId")?,
            &params.string("eventType")?,
            &params.string_or("eventDate", "")?,
            params,
        )?;
        self.send(RequestDescriptor::post(self.stream_path("/events")).with_body(body))
            .await
    }

    fn stream_path(&self, suffix: &str) -> String {
        format!("{}/stream{}", self.credentials.datasource_path(), suffix)
    }
}

#[async_trait]
impl Node for IngestNode {
    fn description(&self) -> &'static NodeDescription {
        &DESCRIPTION
    }

    async fn execute(
        &self,
        resource: &str,
        operation: &str,
        params: &Parameters,
    ) -> Result<Value, NodeError> {
        debug!(node = self.name(), resource, operation, "Executing operation");
        match (resource, operation) {
            ("contact", "upsert") => self.upsert_contact(params).await,
            ("contact", "delete") => self.delete_contact(params).await,
            ("event", "create") => self.create_event(params).await,
            _ => Err(NodeError::unknown_operation(resource, operation)),
        }
    }

    async fn load_options(
        &self,
        method: &str,
        params: &Parameters,
    ) -> Result<Vec<OptionEntry>, NodeError> {
        let catalog = self.catalog();
        match method {
            "getContactProperties" => catalog.list_attributes().await,
            "getEventTypes" => catalog.list_event_types().await,
            "getEventParameters" => {
                catalog
                    .list_event_parameters(&params.string("eventType")?)
                    .await
            }
            _ => Err(NodeError::UnknownOptionsMethod(method.to_string())),
        }
    }

    async fn test_credentials(&self) -> Result<(), NodeError> {
        Ok(self.executor.test_credentials(&self.credentials).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn node(server: &Server, datasource: &str) -> IngestNode {
        IngestNode::new(
            Executor::with_base_url(server.url()),
            IngestCredentials::new("p", datasource, "t"),
        )
    }

    fn params(value: Value) -> Parameters {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_defaults_blank_datasource() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/p/datasource/dsapi/stream/contacts")
            .match_header("authorization", "Bearer t")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!([{"_user_id": "u1", "email": "a@b.com"}])))
            .with_status(200)
            .with_body(r#"{"accepted":1}"#)
            .create_async()
            .await;

        let response = node(&server, "")
            .execute(
                "contact",
                "upsert",
                &params(json!({
                    "userId": "u1",
                    "contactProperties": {"property": [{"field": "email", "value": "a@b.com"}]}
                })),
            )
            .await
            .unwrap();

        assert_eq!(response["accepted"], 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_instant_upsert_sends_sync_flag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/p/datasource/ds1/stream/contacts?_sync")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        node(&server, "ds1")
            .execute(
                "contact",
                "upsert",
                &params(json!({"userId": "u1", "instant": true})),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_contact_encodes_user_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/project/p/datasource/ds1/stream/contacts/a%2Fb")
            .with_status(204)
            .create_async()
            .await;

        let response = node(&server, "ds1")
            .execute("contact", "delete", &params(json!({"userId": "a/b"})))
            .await
            .unwrap();
        assert_eq!(response, json!({}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_event() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/project/p/datasource/ds1/stream/events")
            .match_body(Matcher::PartialJson(json!([{
                "_user_id": "u1",
                "_event_id": "evt-1",
                "_event_type": "purchase",
                "_event_parameters": {"amount": "10"}
            }])))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        node(&server, "ds1")
            .execute(
                "event",
                "create",
                &params(json!({
                    "userId": "u1",
                    "eventId": "evt-1",
                    "eventType": "purchase",
                    "eventParameters": {"parameters": [{"name": "amount", "value": "10"}]}
                })),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_parameter_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = node(&server, "ds1")
            .execute("event", "create", &params(json!({"userId": "u1"})))
            .await
            .unwrap_err();

        assert_eq!(err, NodeError::MissingParameter("eventId".into()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let server = Server::new_async().await;
        let err = node(&server, "ds1")
            .execute("contact", "merge", &Parameters::new())
            .await
            .unwrap_err();
        assert_eq!(err, NodeError::unknown_operation("contact", "merge"));
    }

    #[tokio::test]
    async fn test_load_event_types() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/project/p/datasource/dsapi/stream/specs/events")
            .with_status(200)
            .with_body(r#"{"specs":[{"uid":"purchase","name":"Purchase","emoji":"🛒"}]}"#)
            .create_async()
            .await;

        let options = node(&server, "")
            .load_options("getEventTypes", &Parameters::new())
            .await
            .unwrap();
        assert_eq!(options, vec![OptionEntry::new("🛒 Purchase", "purchase")]);
    }

    #[tokio::test]
    async fn test_load_event_parameters_requires_event_type() {
        let server = Server::new_async().await;
        let err = node(&server, "ds1")
            .load_options("getEventParameters", &Parameters::new())
            .await
            .unwrap_err();
        assert_eq!(err, NodeError::MissingParameter("eventType".into()));
    }

    #[tokio::test]
    async fn test_credentials_check_hits_stream() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/project/p/datasource/dsapi/stream")
            .with_status(401)
            .with_body(r#"{"message":"Invalid token"}"#)
            .create_async()
            .await;

        let err = node(&server, "").test_credentials().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 401: Invalid token");
        mock.assert_async().await;
    }
}
