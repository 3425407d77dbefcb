use crate::model::step::millis;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Aggregate {
    total_queries: u64,
    successes: u64,
    failures: u64,
    cache_hits: u64,
    success_latency: Duration,
}

/// Derived values after one query, ready for the metrics file.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub successes: u64,
    pub failures: u64,
    pub avg_latency_ms: f64,
    pub throughput_qps: f64,
    pub cache_resolved_pct: f64,
}

/// Process-wide counters. Applied exactly once per client query, at its
/// conclusion.
pub struct MetricsService {
    started: Instant,
    inner: Mutex<Aggregate>,
}

impl Default for MetricsService {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            inner: Mutex::new(Aggregate::default()),
        }
    }
}

impl MetricsService {
    pub fn record(&self, success: bool, latency: Duration, cache_hit: bool) -> MetricsSnapshot {
        let mut inner = self.inner.lock().unwrap_or_else(|poison| poison.into_inner());

        inner.total_queries += 1;
        if success {
            inner.successes += 1;
            inner.success_latency += latency;
        } else {
            inner.failures += 1;
        }
        if cache_hit {
            inner.cache_hits += 1;
        }

        let avg_latency_ms = if inner.successes > 0 {
            millis(inner.success_latency) / inner.successes as f64
        } else {
            0.0
        };
        let elapsed = self.started.elapsed().as_secs_f64();
        let throughput_qps = if elapsed > 0.0 {
            inner.total_queries as f64 / elapsed
        } else {
            0.0
        };
        let cache_resolved_pct = (inner.cache_hits as f64 / inner.total_queries as f64) * 100.0;

        let snapshot = MetricsSnapshot {
            total_queries: inner.total_queries,
            successes: inner.successes,
            failures: inner.failures,
            avg_latency_ms,
            throughput_qps,
            cache_resolved_pct,
        };
        tracing::debug!("{snapshot:?}");
        snapshot
    }
}
