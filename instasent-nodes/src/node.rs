use crate::error::NodeError;
use crate::fields::NodeDescription;
use crate::options::OptionEntry;
use crate::params::Parameters;
use async_trait::async_trait;
use serde_json::Value;

/// Node interface for Instasent integrations.
///
/// A node maps a `(resource, operation)` pair plus parameters onto exactly
/// one API request and returns the decoded response. Nodes hold their
/// credentials and an executor; they keep no per-call state, so one node can
/// serve concurrent batches.
///
/// # Lifecycle
/// 1. Host renders a form from `description()` (resources, operations, fields)
/// 2. Host fills dropdowns through `load_options()`
/// 3. Host calls `execute()` once per input item
/// 4. Errors are handled by the batch runner according to its failure policy
///
/// # Example
/// ```no_run
/// use async_trait::async_trait;
/// use instasent_nodes::{Node, NodeDescription, NodeError, OptionEntry, Parameters};
/// use serde_json::{json, Value};
///
/// struct EchoNode(&'static NodeDescription);
///
/// #[async_trait]
/// impl Node for EchoNode {
///     fn description(&self) -> &'static NodeDescription {
///         self.0
///     }
///
///     async fn execute(
///         &self,
///         resource: &str,
///         operation: &str,
///         params: &Parameters,
///     ) -> Result<Value, NodeError> {
///         Ok(json!({"resource": resource, "operation": operation, "params": params}))
///     }
///
///     async fn load_options(
///         &self,
///         method: &str,
///         _params: &Parameters,
///     ) -> Result<Vec<OptionEntry>, NodeError> {
///         Err(NodeError::UnknownOptionsMethod(method.to_string()))
///     }
///
///     async fn test_credentials(&self) -> Result<(), NodeError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Node: Send + Sync {
    /// Static description (name, resources, operations, fields).
    fn description(&self) -> &'static NodeDescription;

    /// Unique identifier used in API routes and logs.
    fn name(&self) -> &str {
        self.description().name
    }

    /// Runs one operation for one item.
    ///
    /// # Returns
    /// * `Ok(Value)` - Decoded response body
    /// * `Err(NodeError::UnknownOperation)` - Pair not offered by this node
    /// * `Err(NodeError::MissingParameter | InvalidParameter)` - Bad input,
    ///   detected before any request is sent
    /// * `Err(NodeError::Api)` - The request failed
    async fn execute(
        &self,
        resource: &str,
        operation: &str,
        params: &Parameters,
    ) -> Result<Value, NodeError>;

    /// Runs a named option loader for a dropdown field.
    async fn load_options(
        &self,
        method: &str,
        params: &Parameters,
    ) -> Result<Vec<OptionEntry>, NodeError>;

    /// Sends the credential test request for this node's credentials.
    async fn test_credentials(&self) -> Result<(), NodeError>;
}
