// file: src/engine/query.rs
// description: query engine coordinating metadata filtering, batching and two-phase evaluation
// reference: batches run in sequence, documents inside a batch run concurrently

use crate::config::{Config, DEFAULT_BATCH_SIZE};
use crate::engine::batch::batch;
use crate::engine::evaluator::TwoPhaseEvaluator;
use crate::engine::filter::filter_documents;
use crate::engine::progress::ProgressTracker;
use crate::engine::prompt::DEFAULT_SYSTEM_PROMPT;
use crate::error::{QueryError, ReagError, Result};
use crate::llm::{ChatCompletionsGenerator, OutputSchema, StructuredGenerator};
use crate::models::{Answer, Document, MetadataFilter, QueryResult, Relevance};
use crate::utils::OperationTimer;
use futures::future::try_join_all;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

#[derive(Default)]
pub struct QueryOptions {
    pub filter: Vec<MetadataFilter>,
    pub progress: Option<Arc<ProgressTracker>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Vec<MetadataFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_clause(mut self, clause: MetadataFilter) -> Self {
        self.filter.push(clause);
        self
    }

    pub fn with_progress(mut self, progress: Arc<ProgressTracker>) -> Self {
        self.progress = Some(progress);
        self
    }
}

pub struct QueryEngineBuilder<T = Answer> {
    reasoning: Arc<dyn StructuredGenerator>,
    filtration: Arc<dyn StructuredGenerator>,
    system_prompt: Option<String>,
    batch_size: Option<usize>,
    schema: Option<OutputSchema>,
    _output: PhantomData<fn() -> T>,
}

impl<T> QueryEngineBuilder<T> {
    /// Replaces the built-in system prompt. Blank prompts keep the default.
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Documents per concurrent batch. Zero means the default of 20.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Overrides the schema derived from the result type.
    pub fn schema(mut self, schema: OutputSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Switches the structured result type. Any schema set so far is
    /// discarded in favour of the one derived from `U`.
    pub fn output<U>(self) -> QueryEngineBuilder<U> {
        QueryEngineBuilder {
            reasoning: self.reasoning,
            filtration: self.filtration,
            system_prompt: self.system_prompt,
            batch_size: self.batch_size,
            schema: None,
            _output: PhantomData,
        }
    }

    pub fn build(self) -> QueryEngine<T>
    where
        T: JsonSchema,
    {
        let batch_size = match self.batch_size {
            Some(0) => {
                debug!("Batch size 0 requested, using default {}", DEFAULT_BATCH_SIZE);
                DEFAULT_BATCH_SIZE
            }
            Some(size) => size,
            None => DEFAULT_BATCH_SIZE,
        };

        let system_prompt = self
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let schema = self.schema.unwrap_or_else(OutputSchema::for_type::<T>);

        QueryEngine {
            evaluator: TwoPhaseEvaluator::new(
                self.filtration,
                self.reasoning,
                system_prompt,
                schema,
            ),
            batch_size,
            _output: PhantomData,
        }
    }
}

/// Asks one question against a set of documents. Every document passing the
/// metadata filter goes through the filtration model; only those it deems
/// relevant reach the reasoning model.
pub struct QueryEngine<T = Answer> {
    evaluator: TwoPhaseEvaluator,
    batch_size: usize,
    _output: PhantomData<fn() -> T>,
}

impl QueryEngine<Answer> {
    pub fn builder(
        reasoning: Arc<dyn StructuredGenerator>,
        filtration: Arc<dyn StructuredGenerator>,
    ) -> QueryEngineBuilder<Answer> {
        QueryEngineBuilder {
            reasoning,
            filtration,
            system_prompt: None,
            batch_size: None,
            schema: None,
            _output: PhantomData,
        }
    }

    /// Builder backed by chat-completion endpoints described in `config`.
    pub fn builder_from_config(config: &Config) -> Result<QueryEngineBuilder<Answer>> {
        config.validate()?;

        let reasoning = Arc::new(ChatCompletionsGenerator::new(config.reasoning.clone()));
        let filtration = Arc::new(ChatCompletionsGenerator::new(config.filtration.clone()));

        let mut builder =
            Self::builder(reasoning, filtration).batch_size(config.engine.batch_size);
        if let Some(prompt) = &config.engine.system_prompt {
            builder = builder.system_prompt(prompt.clone());
        }

        Ok(builder)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::builder_from_config(config)?.build())
    }
}

impl<T> QueryEngine<T>
where
    T: DeserializeOwned + Relevance + Send,
{
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn system_prompt(&self) -> &str {
        self.evaluator.system_prompt()
    }

    pub fn schema(&self) -> &OutputSchema {
        self.evaluator.schema()
    }

    /// Runs the full pipeline. Either every relevant document comes back or a
    /// single `QueryError` does; partial results are never returned.
    pub async fn query<'d>(
        &self,
        prompt: &str,
        documents: &'d [Document],
        options: &QueryOptions,
    ) -> std::result::Result<Vec<QueryResult<'d, T>>, QueryError> {
        let query_id = Uuid::new_v4();
        let span = info_span!("query", %query_id);

        let outcome = self.run(prompt, documents, options).instrument(span).await;

        outcome.map_err(|e| {
            error!("Query {} failed: {}", query_id, e);
            if let Some(progress) = &options.progress {
                progress.abandon("Query failed");
            }
            QueryError::from(e)
        })
    }

    async fn run<'d>(
        &self,
        prompt: &str,
        documents: &'d [Document],
        options: &QueryOptions,
    ) -> Result<Vec<QueryResult<'d, T>>> {
        let timer = OperationTimer::new("query");

        let filtered = filter_documents(documents, &options.filter)?;
        let batches = batch(&filtered, self.batch_size);

        info!(
            "{} of {} documents passed metadata filter, {} batches of up to {}",
            filtered.len(),
            documents.len(),
            batches.len(),
            self.batch_size
        );

        let progress = options.progress.as_deref();
        if let Some(progress) = progress {
            progress.start_query(filtered.len(), batches.len());
        }

        let mut results = Vec::with_capacity(filtered.len());

        for (index, chunk) in batches.iter().enumerate() {
            debug!(
                "Dispatching batch {}/{} ({} documents)",
                index + 1,
                batches.len(),
                chunk.len()
            );
            if let Some(progress) = progress {
                progress.start_batch(index, batches.len());
            }

            let evaluations = chunk.iter().map(|&document| async move {
                let answer = self.evaluator.evaluate::<T>(prompt, document).await?;

                if let Some(progress) = progress {
                    match answer {
                        Some(_) => progress.record_relevant(),
                        None => progress.record_dropped(),
                    }
                }

                Ok::<_, ReagError>(answer.map(|answer| QueryResult::new(answer, document)))
            });

            // Fail fast: the first error drops the rest of the batch.
            let settled = try_join_all(evaluations).await?;
            results.extend(settled.into_iter().flatten());
        }

        if let Some(progress) = progress {
            progress.finish();
        }

        timer.finish(filtered.len(), results.len());

        Ok(results)
    }
}

impl<T> std::fmt::Debug for QueryEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("evaluator", &self.evaluator)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
