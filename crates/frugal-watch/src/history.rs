//! In-memory optimization history
//!
//! Jobs are immutable once recorded; the collection only grows. A mutex is
//! enough since appends are rare and the watcher and CLI readers never hold
//! the lock across I/O.

use chrono::{DateTime, Utc};
use frugal_core::OptimizationJob;
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct OptimizationHistory {
    jobs: Mutex<Vec<OptimizationJob>>,
}

/// Aggregate view over recorded jobs
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub job_count: usize,
    pub total_tokens_saved: usize,
    pub average_reduction_pct: f64,
    pub last_optimization: Option<DateTime<Utc>>,
}

impl OptimizationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, job: OptimizationJob) {
        let mut jobs = match self.jobs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        jobs.push(job);
    }

    pub fn jobs(&self) -> Vec<OptimizationJob> {
        match self.jobs.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn stats(&self) -> HistoryStats {
        let jobs = self.jobs();
        let job_count = jobs.len();
        let total_tokens_saved = jobs.iter().map(|j| j.tokens_saved).sum();
        let average_reduction_pct = if job_count == 0 {
            0.0
        } else {
            jobs.iter().map(|j| j.reduction_pct).sum::<f64>() / job_count as f64
        };
        let last_optimization = jobs.iter().map(|j| j.timestamp).max();

        HistoryStats {
            job_count,
            total_tokens_saved,
            average_reduction_pct,
            last_optimization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_empty_stats() {
        let history = OptimizationHistory::new();
        let stats = history.stats();
        assert_eq!(stats.job_count, 0);
        assert_eq!(stats.total_tokens_saved, 0);
        assert_eq!(stats.average_reduction_pct, 0.0);
        assert!(stats.last_optimization.is_none());
    }

    #[test]
    fn test_stats_aggregate() {
        let history = OptimizationHistory::new();
        history.record(OptimizationJob::new("t1", 10_000, 4_000, HashMap::new()));
        history.record(OptimizationJob::new("t2", 10_000, 8_000, HashMap::new()));

        let stats = history.stats();
        assert_eq!(stats.job_count, 2);
        assert_eq!(stats.total_tokens_saved, 8_000);
        assert!((stats.average_reduction_pct - 40.0).abs() < 1e-9);
        assert!(stats.last_optimization.is_some());
    }

    #[test]
    fn test_concurrent_appends() {
        let history = Arc::new(OptimizationHistory::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let history = Arc::clone(&history);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        history.record(OptimizationJob::new(
                            &format!("t{i}-{j}"),
                            1_000,
                            500,
                            HashMap::new(),
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(history.stats().job_count, 400);
    }
}
