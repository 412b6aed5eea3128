// file: src/llm/generator.rs
// description: the structured generation capability consumed by the query engine
// reference: https://docs.rs/async-trait

use crate::error::GenerationError;
use crate::llm::schema::OutputSchema;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub schema: &'a OutputSchema,
}

/// Produces one structured object for a system prompt, a user prompt and an
/// output schema. Implementations must not retry.
#[async_trait]
pub trait StructuredGenerator: Send + Sync + Debug {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Value, GenerationError>;

    /// Model identifier, used for logging.
    fn model_name(&self) -> &str;
}
