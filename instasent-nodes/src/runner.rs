//! Batch execution of one operation over many input items.
//!
//! Items run in order, one request each. What happens on a failed item is
//! the caller's choice ([`FailurePolicy`]).

use crate::error::NodeError;
use crate::params::Parameters;
use crate::Node;
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, error, warn};

/// What to do when an item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the batch and return the first error
    #[default]
    StopOnFirstError,
    /// Record `{"error": ...}` for the item and keep going
    ContinueOnFail,
}

impl FailurePolicy {
    pub fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailurePolicy::ContinueOnFail
        } else {
            FailurePolicy::StopOnFirstError
        }
    }
}

/// First failure of a batch run under [`FailurePolicy::StopOnFirstError`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchError {
    /// Zero-based index of the failed item
    pub index: usize,
    pub source: NodeError,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}: {}", self.index, self.source)
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Runs `resource`/`operation` once per item and collects one output record
/// per item, in input order.
///
/// Object responses are returned as-is; any other JSON value is wrapped as
/// `{"data": value}` so every record is an object.
pub async fn run_batch(
    node: &dyn Node,
    resource: &str,
    operation: &str,
    items: &[Parameters],
    policy: FailurePolicy,
) -> Result<Vec<Value>, BatchError> {
    let mut records = Vec::with_capacity(items.len());

    for (index, params) in items.iter().enumerate() {
        match node.execute(resource, operation, params).await {
            Ok(response) => {
                debug!(node = node.name(), resource, operation, index, "Item succeeded");
                records.push(as_record(response));
            }
            Err(e) if policy == FailurePolicy::ContinueOnFail => {
                warn!(
                    node = node.name(),
                    resource,
                    operation,
                    index,
                    error = %e,
                    "Item failed, continuing"
                );
                records.push(json!({ "error": e.to_string() }));
            }
            Err(e) => {
                error!(
                    node = node.name(),
                    resource,
                    operation,
                    index,
                    error = %e,
                    "Item failed, stopping batch"
                );
                return Err(BatchError { index, source: e });
            }
        }
    }

    Ok(records)
}

fn as_record(response: Value) -> Value {
    match response {
        Value::Object(_) => response,
        other => json!({ "data": other }),
    }
}
