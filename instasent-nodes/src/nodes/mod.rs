//! Concrete nodes.

pub mod ingest;
pub mod product;
pub(crate) mod stream;

pub use ingest::IngestNode;
pub use product::ProductNode;
