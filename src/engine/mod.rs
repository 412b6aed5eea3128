// file: src/engine/mod.rs
// description: query engine module exports and public api
// reference: filter, batch, evaluate, assemble

pub mod batch;
pub mod evaluator;
pub mod filter;
pub mod progress;
pub mod prompt;
mod query;

pub use batch::{batch, batch_count};
pub use evaluator::TwoPhaseEvaluator;
pub use filter::filter_documents;
pub use progress::{ProgressTracker, QueryStats};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, augmented_system_prompt, render_source};
pub use query::{QueryEngine, QueryEngineBuilder, QueryOptions};
