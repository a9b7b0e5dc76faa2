//! Instasent workflow nodes - pluggable units that turn a
//! `(resource, operation, parameters)` triple into one Instasent API call.
//!
//! # Architecture
//!
//! ```text
//! Host (workflow engine, HTTP API)
//!          ↓  resource + operation + parameters
//! ┌─────────────────────────────────────────┐
//! │       Node (implements trait)            │
//! │  - Validate parameters                   │
//! │  - Build the request descriptor          │
//! │  - Load dropdown options                 │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       instasent adapter                  │
//! │  - Endpoint scopes, query filters        │
//! │  - Bearer-authenticated HTTP call        │
//! │  - Error normalization                   │
//! └─────────────────────────────────────────┘
//!          ↓
//!   Instasent API
//! ```
//!
//! # Core Types
//!
//! - [`Node`] - Trait both nodes implement
//! - [`IngestNode`] - Data source stream ingestion (contacts, events)
//! - [`ProductNode`] - Project-level product API
//! - [`NodeDescription`] - Static resources/operations/fields table
//! - [`run_batch`] - Runs one operation over many items under a [`FailurePolicy`]
//!
//! # Running an operation
//!
//! ```no_run
//! use instasent::{Executor, ProductCredentials};
//! use instasent_nodes::{Node, Parameters, ProductNode};
//!
//! # async fn demo() -> Result<(), instasent_nodes::NodeError> {
//! let node = ProductNode::new(Executor::new(), ProductCredentials::new("token", "project-uid"));
//! let params = Parameters::new().with("userEmail", "ana@example.com");
//! let found = node.execute("audience", "searchByEmail", &params).await?;
//! println!("{}", found);
//! # Ok(())
//! # }
//! ```

mod error;
mod node;
pub mod api;
pub mod fields;
pub mod nodes;
pub mod options;
pub mod params;
pub mod registry;
pub mod runner;

// Re-export public types
pub use error::NodeError;
pub use fields::NodeDescription;
pub use node::Node;
pub use nodes::{IngestNode, ProductNode};
pub use options::OptionEntry;
pub use params::Parameters;
pub use runner::{run_batch, BatchError, FailurePolicy};
