// file: src/engine/evaluator.rs
// description: two-phase per-document evaluation, cheap relevance gate then reasoning call
// reference: filtration and reasoning models share one rendered prompt

use crate::engine::prompt::augmented_system_prompt;
use crate::error::{GenerationError, ReagError, Result};
use crate::llm::{GenerationRequest, OutputSchema, StructuredGenerator};
use crate::models::{Document, Relevance};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Filtration,
    Reasoning,
}

impl Phase {
    fn fail(self, document: &Document, source: GenerationError) -> ReagError {
        let document = document.name.clone();
        match self {
            Self::Filtration => ReagError::Filtration { document, source },
            Self::Reasoning => ReagError::Reasoning { document, source },
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filtration => f.write_str("filtration"),
            Self::Reasoning => f.write_str("reasoning"),
        }
    }
}

pub struct TwoPhaseEvaluator {
    filtration: Arc<dyn StructuredGenerator>,
    reasoning: Arc<dyn StructuredGenerator>,
    system_prompt: String,
    schema: OutputSchema,
}

impl TwoPhaseEvaluator {
    pub fn new(
        filtration: Arc<dyn StructuredGenerator>,
        reasoning: Arc<dyn StructuredGenerator>,
        system_prompt: String,
        schema: OutputSchema,
    ) -> Self {
        Self {
            filtration,
            reasoning,
            system_prompt,
            schema,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Filtering → {Dropped | Reasoning} → {Completed | Failed}.
    ///
    /// Returns `None` when the filtration model marks the document irrelevant;
    /// the reasoning model is not called in that case. Otherwise the
    /// reasoning-phase answer is returned and the filtration answer discarded.
    pub async fn evaluate<T>(&self, prompt: &str, document: &Document) -> Result<Option<T>>
    where
        T: DeserializeOwned + Relevance,
    {
        let system = augmented_system_prompt(&self.system_prompt, document)?;
        let request = GenerationRequest {
            system: &system,
            prompt,
            schema: &self.schema,
        };

        let gate: T = self
            .run_phase(Phase::Filtration, self.filtration.as_ref(), request, document)
            .await?;

        if gate.is_irrelevant() {
            debug!("Document '{}' dropped as irrelevant", document.name);
            return Ok(None);
        }

        let answer: T = self
            .run_phase(Phase::Reasoning, self.reasoning.as_ref(), request, document)
            .await?;

        debug!("Document '{}' completed", document.name);
        Ok(Some(answer))
    }

    async fn run_phase<T: DeserializeOwned>(
        &self,
        phase: Phase,
        generator: &dyn StructuredGenerator,
        request: GenerationRequest<'_>,
        document: &Document,
    ) -> Result<T> {
        debug!(
            "Document '{}' entering {} phase ({})",
            document.name,
            phase,
            generator.model_name()
        );

        let value = generator
            .generate(request)
            .await
            .map_err(|e| phase.fail(document, e))?;

        serde_json::from_value(value).map_err(|e| {
            phase.fail(
                document,
                GenerationError::MalformedOutput(format!(
                    "Output does not match schema {}: {}",
                    self.schema.name, e
                )),
            )
        })
    }
}

impl fmt::Debug for TwoPhaseEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoPhaseEvaluator")
            .field("filtration", &self.filtration)
            .field("reasoning", &self.reasoning)
            .field("schema", &self.schema.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedGenerator {
        reply: std::result::Result<Value, String>,
        calls: AtomicUsize,
        last_system: Mutex<Option<String>>,
    }

    impl FixedGenerator {
        fn replying(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
                last_system: Mutex::new(None),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_system: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StructuredGenerator for FixedGenerator {
        async fn generate(
            &self,
            request: GenerationRequest<'_>,
        ) -> std::result::Result<Value, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system.lock().unwrap() = Some(request.system.to_string());
            self.reply
                .clone()
                .map_err(GenerationError::Transport)
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn answer(irrelevant: bool, content: &str) -> Value {
        json!({"content": content, "reasoning": "r", "isIrrelevant": irrelevant})
    }

    fn evaluator(
        filtration: Arc<FixedGenerator>,
        reasoning: Arc<FixedGenerator>,
    ) -> TwoPhaseEvaluator {
        TwoPhaseEvaluator::new(
            filtration,
            reasoning,
            "base".to_string(),
            OutputSchema::for_type::<Answer>(),
        )
    }

    #[tokio::test]
    async fn test_relevant_document_returns_reasoning_answer() {
        let filtration = FixedGenerator::replying(answer(false, "from filtration"));
        let reasoning = FixedGenerator::replying(answer(false, "from reasoning"));
        let engine = evaluator(filtration.clone(), reasoning.clone());
        let doc = Document::new("doc", "body");

        let result: Option<Answer> = engine.evaluate("question", &doc).await.unwrap();

        assert_eq!(result.unwrap().content, "from reasoning");
        assert_eq!(filtration.calls(), 1);
        assert_eq!(reasoning.calls(), 1);
        assert_eq!(
            filtration.last_system.lock().unwrap().as_deref(),
            reasoning.last_system.lock().unwrap().as_deref()
        );
    }

    #[tokio::test]
    async fn test_irrelevant_document_skips_reasoning() {
        let filtration = FixedGenerator::replying(answer(true, ""));
        let reasoning = FixedGenerator::replying(answer(false, "unused"));
        let engine = evaluator(filtration.clone(), reasoning.clone());
        let doc = Document::new("doc", "body");

        let result: Option<Answer> = engine.evaluate("question", &doc).await.unwrap();

        assert!(result.is_none());
        assert_eq!(reasoning.calls(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_tagged_by_phase() {
        let doc = Document::new("doc", "body");

        let engine = evaluator(
            FixedGenerator::failing("timeout"),
            FixedGenerator::replying(answer(false, "x")),
        );
        let err = engine.evaluate::<Answer>("q", &doc).await.unwrap_err();
        assert!(matches!(err, ReagError::Filtration { ref document, .. } if document == "doc"));

        let engine = evaluator(
            FixedGenerator::replying(answer(false, "x")),
            FixedGenerator::failing("timeout"),
        );
        let err = engine.evaluate::<Answer>("q", &doc).await.unwrap_err();
        assert!(matches!(err, ReagError::Reasoning { .. }));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_phase_failure() {
        let engine = evaluator(
            FixedGenerator::replying(json!({"unexpected": true})),
            FixedGenerator::replying(answer(false, "x")),
        );
        let doc = Document::new("doc", "body");

        let err = engine.evaluate::<Answer>("q", &doc).await.unwrap_err();
        assert!(matches!(
            err,
            ReagError::Filtration {
                source: GenerationError::MalformedOutput(_),
                ..
            }
        ));
    }
}
