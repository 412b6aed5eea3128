// file: src/models/query_result.rs
// description: per-document query result pairing the structured answer with its source
// reference: Used for query engine output

use crate::models::document::Document;
use serde::Serialize;
use std::ops::Deref;

/// A structured answer for a document judged relevant. The answer's fields
/// are flattened next to `document` when serialized.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a, T> {
    #[serde(flatten)]
    pub answer: T,
    pub document: &'a Document,
}

impl<'a, T> QueryResult<'a, T> {
    pub fn new(answer: T, document: &'a Document) -> Self {
        Self { answer, document }
    }

    pub fn into_answer(self) -> T {
        self.answer
    }
}

impl<T> Deref for QueryResult<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.answer
    }
}
