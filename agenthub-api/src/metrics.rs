use shared_types::MetricsSnapshot;
use std::sync::Mutex;

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    api_calls: u64,
    successful_calls: u64,
    total_cost: f64,
    avg_response_time: f64,
    error_count: u64,
}

/// Process-wide call counters. Not persisted; reset only on request.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: Mutex<Counters>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one provider call. The running average latency only counts
    /// successful calls, so failures never dilute it.
    pub fn record_api_call(&self, duration_ms: u64, cost: f64, success: bool) {
        let mut counters = self.lock();

        counters.api_calls += 1;
        counters.total_cost += cost;

        if success {
            counters.successful_calls += 1;
            let n = counters.successful_calls as f64;
            counters.avg_response_time =
                (counters.avg_response_time * (n - 1.0) + duration_ms as f64) / n;
        } else {
            counters.error_count += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = *self.lock();

        let success_rate = if counters.api_calls > 0 {
            let rate = (counters.api_calls - counters.error_count) as f64
                / counters.api_calls as f64
                * 100.0;
            format!("{:.2}%", rate)
        } else {
            "0%".to_string()
        };

        MetricsSnapshot {
            api_calls: counters.api_calls,
            total_cost: counters.total_cost,
            avg_response_time: counters.avg_response_time,
            error_count: counters.error_count,
            success_rate,
        }
    }

    pub fn reset(&self) {
        *self.lock() = Counters::default();
    }

    // Every update leaves the counters consistent; poisoning is ignored.
    fn lock(&self) -> std::sync::MutexGuard<'_, Counters> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let metrics = MetricsCollector::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.api_calls, 0);
        assert_eq!(snapshot.total_cost, 0.0);
        assert_eq!(snapshot.avg_response_time, 0.0);
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.success_rate, "0%");
    }

    #[test]
    fn test_average_over_successful_calls_only() {
        let metrics = MetricsCollector::new();
        metrics.record_api_call(100, 0.01, true);
        metrics.record_api_call(5000, 0.0, false);
        metrics.record_api_call(300, 0.02, true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.api_calls, 3);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(snapshot.avg_response_time, 200.0);
        assert!((snapshot.total_cost - 0.03).abs() < 1e-12);
        assert_eq!(snapshot.success_rate, "66.67%");
    }

    #[test]
    fn test_all_successful() {
        let metrics = MetricsCollector::new();
        metrics.record_api_call(50, 0.001, true);
        assert_eq!(metrics.snapshot().success_rate, "100.00%");
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsCollector::new();
        metrics.record_api_call(100, 0.5, true);
        metrics.record_api_call(100, 0.0, false);
        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.api_calls, 0);
        assert_eq!(snapshot.total_cost, 0.0);
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.success_rate, "0%");
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let metrics = std::sync::Arc::new(MetricsCollector::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.record_api_call(10, 0.0, true);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.api_calls, 800);
        assert_eq!(snapshot.avg_response_time, 10.0);
    }
}
