// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod document;
pub mod filter;
pub mod query_result;

pub use answer::{Answer, Relevance};
pub use document::{Document, Metadata, MetadataValue};
pub use filter::{FilterOperator, MetadataFilter};
pub use query_result::QueryResult;
