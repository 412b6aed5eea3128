// file: src/utils/telemetry.rs
// description: timing and throughput summary for a single query run
// reference: https://docs.rs/tracing

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Times one named operation and logs a throughput summary when finished.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Timing {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Logs and returns metrics for `evaluated` documents, `relevant` of
    /// which produced an answer.
    pub fn finish(self, evaluated: usize, relevant: usize) -> PerformanceMetrics {
        let metrics = PerformanceMetrics::new(&self.operation, evaluated, relevant, self.elapsed());
        info!("{}", metrics);
        metrics
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub operation: String,
    pub evaluated: usize,
    pub relevant: usize,
    pub duration_ms: u64,
    /// documents per second
    pub throughput: f64,
}

impl PerformanceMetrics {
    pub fn new(operation: &str, evaluated: usize, relevant: usize, duration: Duration) -> Self {
        let secs = duration.as_secs_f64();
        let throughput = if secs > 0.0 {
            evaluated as f64 / secs
        } else {
            0.0
        };

        Self {
            operation: operation.to_string(),
            evaluated,
            relevant,
            duration_ms: duration.as_millis() as u64,
            throughput,
        }
    }
}

impl std::fmt::Display for PerformanceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} relevant of {} documents in {}ms ({:.2} docs/sec)",
            self.operation, self.relevant, self.evaluated, self.duration_ms, self.throughput
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_metrics() {
        let metrics = PerformanceMetrics::new("query", 100, 7, Duration::from_secs(10));
        assert_eq!(metrics.throughput, 10.0);
        assert_eq!(
            metrics.to_string(),
            "query: 7 relevant of 100 documents in 10000ms (10.00 docs/sec)"
        );
    }

    #[test]
    fn test_performance_metrics_empty() {
        let metrics = PerformanceMetrics::new("query", 0, 0, Duration::ZERO);
        assert_eq!(metrics.throughput, 0.0);
    }

    #[test]
    fn test_timer_finish() {
        let timer = OperationTimer::new("query");
        std::thread::sleep(Duration::from_millis(10));
        let metrics = timer.finish(3, 1);
        assert!(metrics.duration_ms >= 10);
        assert_eq!(metrics.relevant, 1);
    }
}
