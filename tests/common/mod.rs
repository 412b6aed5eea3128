// file: tests/common/mod.rs
// description: scripted structured generators shared by integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use reag::{GenerationError, GenerationRequest, StructuredGenerator};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Script = dyn Fn(&str) -> Result<Value, GenerationError> + Send + Sync;

/// Answers according to a script keyed by the document name rendered into
/// the system prompt. Counts calls and the peak number of calls in flight.
pub struct ScriptedGenerator {
    script: Box<Script>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
    systems: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: impl Fn(&str) -> Result<Value, GenerationError> + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            systems: Mutex::new(Vec::new()),
        }
    }

    /// Every document is relevant; `content` echoes the document name.
    pub fn all_relevant() -> Self {
        Self::new(|name| Ok(answer(false, &format!("answer for {}", name))))
    }

    /// Documents whose name appears in `irrelevant` are marked irrelevant.
    pub fn relevance_by_name(irrelevant: &'static [&'static str]) -> Self {
        Self::new(move |name| Ok(answer(irrelevant.iter().any(|n| *n == name), name)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn systems(&self) -> Vec<String> {
        self.systems.lock().unwrap().clone()
    }
}

impl fmt::Debug for ScriptedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedGenerator")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StructuredGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Value, GenerationError> {
        let name = document_name(request.system);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(name.clone());
        self.systems.lock().unwrap().push(request.system.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.script)(&name)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn answer(irrelevant: bool, content: &str) -> Value {
    json!({
        "content": content,
        "reasoning": format!("reasoning about {}", content),
        "isIrrelevant": irrelevant,
    })
}

pub fn document_name(system: &str) -> String {
    system
        .lines()
        .find_map(|line| line.strip_prefix("Name: "))
        .unwrap_or_default()
        .to_string()
}
