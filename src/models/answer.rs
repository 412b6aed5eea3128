// file: src/models/answer.rs
// description: default structured answer and the relevance contract for result types
// reference: https://docs.rs/schemars

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimal contract every structured result must satisfy so the engine can
/// drop documents the filtration model judged irrelevant.
pub trait Relevance {
    fn is_irrelevant(&self) -> bool;
}

/// Default structured output requested from both models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// The source of the information, relevant passage
    pub content: String,
    /// The reasoning behind why the source is relevant
    pub reasoning: String,
    /// Whether the source is relevant to the question
    pub is_irrelevant: bool,
}

impl Relevance for Answer {
    fn is_irrelevant(&self) -> bool {
        self.is_irrelevant
    }
}
