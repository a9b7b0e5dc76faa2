//! Product API node: organization, project, audience, data source stream,
//! segment, campaign, automation, SMS sender and SMS resources.
//!
//! Every resource except `organization` is scoped to the credentials'
//! project; paths in the resource modules are written relative to
//! `/project/{uid}`.

mod audience;
mod datasource_stream;
mod description;
mod listing;
mod load_options;
mod project;
mod sms;

pub use description::DESCRIPTION;

use crate::error::NodeError;
use crate::fields::NodeDescription;
use crate::options::OptionEntry;
use crate::params::Parameters;
use crate::Node;
use async_trait::async_trait;
use instasent::{Executor, FilterRequest, FilterSpec, ProductCredentials, RequestDescriptor};
use serde_json::Value;
use tracing::debug;

/// Page size used when `returnAll` is set.
const RETURN_ALL_LIMIT: u64 = 100;
/// Page size used when neither `returnAll` nor `limit` is given.
const DEFAULT_LIST_LIMIT: u64 = 50;

/// Product node bound to one project.
pub struct ProductNode {
    executor: Executor,
    credentials: ProductCredentials,
}

impl ProductNode {
    pub fn new(executor: Executor, credentials: ProductCredentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    /// Sends a request whose path is relative to the API base.
    async fn send(&self, request: RequestDescriptor) -> Result<Value, NodeError> {
        Ok(self.executor.execute(&self.credentials, &request).await?)
    }

    /// Sends a request whose path is relative to the project scope.
    async fn send_in_project(&self, mut request: RequestDescriptor) -> Result<Value, NodeError> {
        request.path = format!("{}{}", self.credentials.project_path(), request.path);
        self.send(request).await
    }
}

/// `_start=0&_limit=N` plus the optional raw `queryFilterJson` as `_q`.
fn list_request(params: &Parameters) -> Result<FilterRequest, NodeError> {
    let limit = if params.bool_or("returnAll", false)? {
        RETURN_ALL_LIMIT
    } else {
        params.u64_or("limit", DEFAULT_LIST_LIMIT)?
    };
    Ok(FilterRequest::new()
        .start(0)
        .limit(limit)
        .filter(FilterSpec::raw(params.json_text("queryFilterJson", "{}"))))
}

#[async_trait]
impl Node for ProductNode {
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
        match resource {
            "organization" => self.organization(operation).await,
            "project" => self.project(operation, params).await,
            "audience" => self.audience(operation, params).await,
            "datasourceStream" => self.datasource_stream(operation, params).await,
            "segment" => self.segment(operation, params).await,
            "campaign" | "automation" => self.campaign_or_automation(resource, operation, params).await,
            "smsSender" => self.sms_sender(operation, params).await,
            "sms" => self.sms(operation, params).await,
            _ => Err(NodeError::unknown_operation(resource, operation)),
        }
    }

    async fn load_options(
        &self,
        method: &str,
        params: &Parameters,
    ) -> Result<Vec<OptionEntry>, NodeError> {
        self.options(method, params).await
    }

    async fn test_credentials(&self) -> Result<(), NodeError> {
        Ok(self.executor.test_credentials(&self.credentials).await?)
    }
}
