//! Node registry - which nodes exist and which can run with the
//! credentials at hand.

use crate::fields::NodeDescription;
use crate::nodes::{ingest, product, IngestNode, ProductNode};
use crate::Node;
use instasent::{Executor, IngestCredentials, ProductCredentials};
use std::sync::Arc;
use tracing::{info, warn};

/// Credentials available to the host. A node whose credentials are missing
/// is described but not instantiated.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    pub ingest: Option<IngestCredentials>,
    pub product: Option<ProductCredentials>,
}

impl CredentialSet {
    /// Loads both credential schemas from the environment; an incomplete
    /// schema is logged and left out.
    pub fn from_env() -> Self {
        Self {
            ingest: loaded(ingest::DESCRIPTION.name, IngestCredentials::from_env()),
            product: loaded(product::DESCRIPTION.name, ProductCredentials::from_env()),
        }
    }
}

fn loaded<T>(node: &str, credentials: anyhow::Result<T>) -> Option<T> {
    match credentials {
        Ok(credentials) => Some(credentials),
        Err(e) => {
            warn!(node = node, error = %e, "Credentials not configured, node disabled");
            None
        }
    }
}

/// Descriptions of every node, configured or not.
pub fn all_descriptions() -> [&'static NodeDescription; 2] {
    [&ingest::DESCRIPTION, &product::DESCRIPTION]
}

/// Instantiates the nodes whose credentials are present.
pub fn build_nodes(executor: &Executor, credentials: &CredentialSet) -> Vec<Arc<dyn Node>> {
    let mut nodes: Vec<Arc<dyn Node>> = Vec::new();

    if let Some(creds) = &credentials.ingest {
        nodes.push(Arc::new(IngestNode::new(executor.clone(), creds.clone())));
    }
    if let Some(creds) = &credentials.product {
        nodes.push(Arc::new(ProductNode::new(executor.clone(), creds.clone())));
    }

    info!(count = nodes.len(), "Nodes registered");
    nodes
}
