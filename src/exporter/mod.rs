// file: src/exporter/mod.rs
// description: query result export module exports

pub mod json;

pub use json::{JsonExporter, QueryReport};
