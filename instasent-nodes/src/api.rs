//! Host HTTP API - lets a workflow host drive the nodes over HTTP.
//!
//! Routes:
//! - `GET /api/nodes` - every node with its resources and operations
//! - `GET /api/nodes/:node/fields?resource=&operation=` - fields shown for a pair
//! - `GET /api/nodes/:node/options/:method` - dropdown options (query string = parameters)
//! - `POST /api/nodes/:node/execute` - run one operation over a batch of items
//! - `POST /api/nodes/:node/credentials/test` - send the credential test request

use crate::error::NodeError;
use crate::fields::{FieldSpec, NodeDescription, ResourceSpec};
use crate::options::OptionEntry;
use crate::params::Parameters;
use crate::registry::all_descriptions;
use crate::runner::{run_batch, BatchError, FailurePolicy};
use crate::Node;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state for the host API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Nodes with credentials, ready to run
    pub nodes: Vec<Arc<dyn Node>>,
    /// Policy used when a request does not set `continueOnFail`
    pub default_policy: FailurePolicy,
}

impl ApiState {
    fn node(&self, name: &str) -> Result<&Arc<dyn Node>, AppError> {
        self.nodes
            .iter()
            .find(|n| n.name() == name)
            .ok_or_else(|| AppError::NotFound(format!("Node '{}' not found or not configured", name)))
    }
}

/// A single entry in the `GET /api/nodes` response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub credential: &'static str,
    /// True when the node's credentials are loaded
    pub configured: bool,
    pub resources: &'static [ResourceSpec],
}

#[derive(Serialize)]
pub struct NodeListResponse {
    pub nodes: Vec<NodeInfo>,
}

#[derive(Deserialize)]
pub struct FieldsQuery {
    pub resource: String,
    pub operation: String,
}

/// Request body for `POST /api/nodes/:node/execute`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub resource: String,
    pub operation: String,
    /// One parameter map per item; omitted means a single empty item
    #[serde(default = "single_item")]
    pub items: Vec<Parameters>,
    #[serde(default)]
    pub continue_on_fail: Option<bool>,
}

fn single_item() -> Vec<Parameters> {
    vec![Parameters::new()]
}

#[derive(Serialize)]
pub struct ExecuteResponse {
    pub items: Vec<Value>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<usize>,
}

// ---------------------------------------------------------------------------
// Business logic (called from HTTP handlers and unit tests)
// ---------------------------------------------------------------------------

/// Lists every known node, marking which ones are configured.
pub fn handle_list_nodes(state: &ApiState) -> Vec<NodeInfo> {
    all_descriptions()
        .into_iter()
        .map(|d| NodeInfo {
            name: d.name,
            display_name: d.display_name,
            description: d.description,
            credential: d.credential,
            configured: state.nodes.iter().any(|n| n.name() == d.name),
            resources: d.resources,
        })
        .collect()
}

/// Fields shown for a resource/operation pair. Works for unconfigured nodes.
pub fn handle_fields(
    node: &str,
    resource: &str,
    operation: &str,
) -> Result<Vec<&'static FieldSpec>, AppError> {
    let description: &'static NodeDescription = all_descriptions()
        .into_iter()
        .find(|d| d.name == node)
        .ok_or_else(|| AppError::NotFound(format!("Node '{}' not found", node)))?;

    if !description.supports(resource, operation) {
        return Err(NodeError::unknown_operation(resource, operation).into());
    }
    Ok(description.fields_for(resource, operation))
}

pub async fn handle_load_options(
    state: &ApiState,
    node: &str,
    method: &str,
    params: Parameters,
) -> Result<Vec<OptionEntry>, AppError> {
    let node = state.node(node)?;
    Ok(node.load_options(method, &params).await?)
}

/// Runs a batch. The request's `continueOnFail` overrides the configured
/// default policy.
pub async fn handle_execute(
    state: &ApiState,
    node: &str,
    req: ExecuteRequest,
) -> Result<Vec<Value>, AppError> {
    let node = state.node(node)?;
    if !node.description().supports(&req.resource, &req.operation) {
        return Err(NodeError::unknown_operation(&req.resource, &req.operation).into());
    }

    let policy = req
        .continue_on_fail
        .map(FailurePolicy::from_continue_on_fail)
        .unwrap_or(state.default_policy);

    let records = run_batch(
        node.as_ref(),
        &req.resource,
        &req.operation,
        &req.items,
        policy,
    )
    .await?;

    info!(
        node = node.name(),
        resource = %req.resource,
        operation = %req.operation,
        items = records.len(),
        "Batch executed"
    );
    Ok(records)
}

pub async fn handle_test_credentials(state: &ApiState, node: &str) -> Result<(), AppError> {
    let node = state.node(node)?;
    node.test_credentials().await?;
    info!(node = node.name(), "Credential test passed");
    Ok(())
}

// ---------------------------------------------------------------------------
// HTTP handlers
// ---------------------------------------------------------------------------

async fn list_nodes(State(state): State<Arc<ApiState>>) -> Json<NodeListResponse> {
    Json(NodeListResponse {
        nodes: handle_list_nodes(&state),
    })
}

async fn get_fields(
    Path(node): Path<String>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<Vec<&'static FieldSpec>>, AppError> {
    let fields = handle_fields(&node, &query.resource, &query.operation)?;
    Ok(Json(fields))
}

async fn get_options(
    State(state): State<Arc<ApiState>>,
    Path((node, method)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<OptionEntry>>, AppError> {
    let params: Map<String, Value> = query
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    let options = handle_load_options(&state, &node, &method, Parameters::from_map(params)).await?;
    Ok(Json(options))
}

async fn post_execute(
    State(state): State<Arc<ApiState>>,
    Path(node): Path<String>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    let items = handle_execute(&state, &node, req).await?;
    Ok(Json(ExecuteResponse { items }))
}

async fn post_test_credentials(
    State(state): State<Arc<ApiState>>,
    Path(node): Path<String>,
) -> Result<StatusCode, AppError> {
    handle_test_credentials(&state, &node).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest { message: String, item: Option<usize> },
    Upstream { message: String, item: Option<usize> },
}

impl AppError {
    fn from_node_error(e: NodeError, item: Option<usize>) -> Self {
        let message = e.to_string();
        if e.is_input_error() {
            AppError::BadRequest { message, item }
        } else {
            AppError::Upstream { message, item }
        }
    }
}

impl From<NodeError> for AppError {
    fn from(e: NodeError) -> Self {
        AppError::from_node_error(e, None)
    }
}

impl From<BatchError> for AppError {
    fn from(e: BatchError) -> Self {
        AppError::from_node_error(e.source, Some(e.index))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, item) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::BadRequest { message, item } => (StatusCode::BAD_REQUEST, message, item),
            AppError::Upstream { message, item } => {
                warn!(error = %message, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, message, item)
            }
        };
        (status, Json(ErrorResponse { error, item })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/nodes", get(list_nodes))
        .route("/api/nodes/:node/fields", get(get_fields))
        .route("/api/nodes/:node/options/:method", get(get_options))
        .route("/api/nodes/:node/execute", post(post_execute))
        .route(
            "/api/nodes/:node/credentials/test",
            post(post_test_credentials),
        )
        .with_state(Arc::new(state))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
