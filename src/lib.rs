//! Request/response adapter for the Instasent REST API.
//!
//! ```text
//!   caller (node, CLI, batch job)
//!          ↓  validated parameters
//! ┌─────────────────────────────────────────┐
//! │  filter     query strings / search bodies│
//! │  endpoint   tenant + data source paths   │
//! └─────────────────────────────────────────┘
//!          ↓  RequestDescriptor
//! ┌─────────────────────────────────────────┐
//! │  client     one HTTP call, bearer auth   │
//! │  error      uniform failure messages     │
//! └─────────────────────────────────────────┘
//!          ↓
//!   Instasent API (https://api.instasent.com/v1)
//! ```

// Configuration (TOML)
pub mod config;

// Credential schemas
pub mod credentials;

// Base URLs and scope paths
pub mod endpoint;

// Query-filter builder
pub mod filter;

// Request descriptors
pub mod request;

// Request executor
pub mod client;

// Error normalizer
pub mod error;

pub use client::Executor;
pub use credentials::{BearerCredentials, IngestCredentials, ProductCredentials};
pub use error::ApiError;
pub use filter::{FilterRequest, FilterSpec};
pub use request::{QueryParams, RequestDescriptor};
