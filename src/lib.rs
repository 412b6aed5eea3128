// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod engine;
pub mod error;
pub mod exporter;
pub mod llm;
pub mod loader;
pub mod models;
pub mod utils;

pub use config::{Config, DEFAULT_BATCH_SIZE, EngineSettings, LoaderConfig, ModelConfig};
pub use engine::{
    DEFAULT_SYSTEM_PROMPT, ProgressTracker, QueryEngine, QueryEngineBuilder, QueryOptions,
    QueryStats, TwoPhaseEvaluator, batch, filter_documents,
};
pub use error::{GenerationError, QueryError, ReagError, Result};
pub use exporter::{JsonExporter, QueryReport};
pub use llm::{ChatCompletionsGenerator, GenerationRequest, OutputSchema, StructuredGenerator};
pub use loader::{DocumentScanner, load_documents};
pub use models::{
    Answer, Document, FilterOperator, Metadata, MetadataFilter, MetadataValue, QueryResult,
    Relevance,
};
pub use utils::{OperationTimer, PerformanceMetrics, Validator};
