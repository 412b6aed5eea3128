// file: src/llm/mod.rs
// description: structured generation capability and its HTTP implementation
// reference: internal module structure

pub mod chat_completions;
pub mod generator;
pub mod schema;

pub use chat_completions::ChatCompletionsGenerator;
pub use generator::{GenerationRequest, StructuredGenerator};
pub use schema::OutputSchema;
