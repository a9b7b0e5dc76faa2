use super::ProductNode;
use crate::error::NodeError;
use crate::params::Parameters;
use instasent::endpoint::encode_segment;
use instasent::RequestDescriptor;
use serde_json::Value;

impl ProductNode {
    /// `GET /`: the organization behind the token, not project-scoped.
    pub(super) async fn organization(&self, operation: &str) -> Result<Value, NodeError> {
        match operation {
            "get" => self.send(RequestDescriptor::get("/")).await,
            _ => Err(NodeError::unknown_operation("organization", operation)),
        }
    }

    pub(super) async fn project(&self, operation: &str, params: &Parameters) -> Result<Value, NodeError> {
        let path = match operation {
            "get" => String::new(),
            "getAttributes" => "/specs/attributes".to_string(),
            "getEventTypes" => "/specs/events".to_string(),
            "getEventParameters" => {
                format!("/specs/events/{}", encode_segment(&params.string("eventType")?))
            }
            _ => return Err(NodeError::unknown_operation("project", operation)),
        };
        self.send_in_project(RequestDescriptor::get(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{node, params};
    use super::*;
    use crate::Node;
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn test_organization_is_unscoped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"entity":{"projects":[]}}"#)
            .create_async()
            .await;

        let response = node(&server)
            .execute("organization", "get", &Parameters::new())
            .await
            .unwrap();
        assert_eq!(response["entity"]["projects"], json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_project_get_uses_scope_root() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/project/uid-1")
            .with_status(200)
            .with_body(r#"{"entity":{"uid":"uid-1"}}"#)
            .create_async()
            .await;

        node(&server)
            .execute("project", "get", &Parameters::new())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_project_event_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/project/uid-1/specs/events/purchase")
            .with_status(200)
            .with_body(r#"{"entities":[]}"#)
            .create_async()
            .await;

        node(&server)
            .execute("project", "getEventParameters", &params(json!({"eventType": "purchase"})))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
