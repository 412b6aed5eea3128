// file: src/engine/progress.rs
// description: progress tracking and statistics for query execution
// reference: uses indicatif for progress bars and tracks evaluation counts

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryStats {
    pub documents_filtered: usize,
    pub documents_relevant: usize,
    pub documents_dropped: usize,
    pub batches: usize,
    pub duration_secs: f64,
}

impl QueryStats {
    pub fn documents_evaluated(&self) -> usize {
        self.documents_relevant + self.documents_dropped
    }

    pub fn relevance_rate(&self) -> f64 {
        let evaluated = self.documents_evaluated();
        if evaluated == 0 {
            return 0.0;
        }
        (self.documents_relevant as f64 / evaluated as f64) * 100.0
    }
}

/// Shared by all evaluations of one query; counters are atomics so
/// concurrently polled evaluations can report without locking.
pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    documents_filtered: AtomicUsize,
    documents_relevant: AtomicUsize,
    documents_dropped: AtomicUsize,
    batches: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(colored: bool) -> Self {
        let multi_progress = MultiProgress::new();
        let main_bar = multi_progress.add(create_progress_bar(colored));
        let detail_bar = multi_progress.add(create_detail_bar());
        Self::from_bars(main_bar, detail_bar)
    }

    /// Tracker that only counts, for library callers without a terminal.
    pub fn hidden() -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let main_bar = multi_progress.add(ProgressBar::hidden());
        let detail_bar = multi_progress.add(ProgressBar::hidden());
        Self::from_bars(main_bar, detail_bar)
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            documents_filtered: AtomicUsize::new(0),
            documents_relevant: AtomicUsize::new(0),
            documents_dropped: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    /// Resets all counters, so a tracker can be reused across queries.
    pub fn start_query(&self, documents: usize, batches: usize) {
        self.documents_filtered.store(documents, Ordering::SeqCst);
        self.documents_relevant.store(0, Ordering::SeqCst);
        self.documents_dropped.store(0, Ordering::SeqCst);
        self.batches.store(batches, Ordering::SeqCst);
        self.main_bar.reset();
        self.main_bar.set_length(documents as u64);
        self.update_detail_bar();
    }

    pub fn start_batch(&self, index: usize, total: usize) {
        self.main_bar
            .set_message(format!("batch {}/{}", index + 1, total));
    }

    pub fn record_relevant(&self) {
        self.documents_relevant.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn record_dropped(&self) {
        self.documents_dropped.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Query complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn abandon(&self, message: &str) {
        self.main_bar.abandon_with_message(message.to_string());
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> QueryStats {
        QueryStats {
            documents_filtered: self.documents_filtered.load(Ordering::SeqCst),
            documents_relevant: self.documents_relevant.load(Ordering::SeqCst),
            documents_dropped: self.documents_dropped.load(Ordering::SeqCst),
            batches: self.batches.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let relevant = self.documents_relevant.load(Ordering::SeqCst);
        let dropped = self.documents_dropped.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Relevant: {} | Irrelevant: {}", relevant, dropped));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.main_bar.is_finished() {
            self.finish();
        }
    }
}

fn create_progress_bar(colored: bool) -> ProgressBar {
    let bar = ProgressBar::new(0);
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"
    };
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(if colored { "█▓▒░" } else { "=>-" });
    bar.set_style(style);
    bar
}

fn create_detail_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_stats_calculations() {
        let stats = QueryStats {
            documents_filtered: 10,
            documents_relevant: 3,
            documents_dropped: 1,
            batches: 1,
            duration_secs: 1.0,
        };

        assert_eq!(stats.documents_evaluated(), 4);
        assert_eq!(stats.relevance_rate(), 75.0);
        assert_eq!(QueryStats::default().relevance_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts() {
        let tracker = ProgressTracker::hidden();
        tracker.start_query(5, 2);
        tracker.start_batch(0, 2);
        tracker.record_relevant();
        tracker.record_dropped();
        tracker.record_dropped();

        let stats = tracker.get_stats();
        assert_eq!(stats.documents_filtered, 5);
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.documents_relevant, 1);
        assert_eq!(stats.documents_dropped, 2);
    }

    #[test]
    fn test_start_query_resets_counts() {
        let tracker = ProgressTracker::hidden();
        tracker.start_query(3, 1);
        tracker.record_relevant();
        tracker.record_dropped();

        tracker.start_query(2, 1);
        tracker.record_relevant();

        let stats = tracker.get_stats();
        assert_eq!(stats.documents_filtered, 2);
        assert_eq!(stats.documents_relevant, 1);
        assert_eq!(stats.documents_dropped, 0);
    }
}
