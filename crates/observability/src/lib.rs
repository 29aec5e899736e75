use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Per-session counters. Cheap enough to bump on every turn.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    turns_total: AtomicU64,
    classifier_inference_total: AtomicU64,
    fallback_total: AtomicU64,
    bookings_total: AtomicU64,
    cancellations_total: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub turns_total: u64,
    pub classifier_inference_total: u64,
    pub fallback_total: u64,
    pub bookings_total: u64,
    pub cancellations_total: u64,
    pub fallback_ratio: f64,
}

impl SessionMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_turn(&self) {
        self.turns_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_classifier_inference(&self) {
        self.classifier_inference_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fallback(&self) {
        self.fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_booking(&self) {
        self.bookings_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cancellation(&self) {
        self.cancellations_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let turns = self.turns_total.load(Ordering::Relaxed);
        let fallbacks = self.fallback_total.load(Ordering::Relaxed);

        MetricsSnapshot {
            turns_total: turns,
            classifier_inference_total: self.classifier_inference_total.load(Ordering::Relaxed),
            fallback_total: fallbacks,
            bookings_total: self.bookings_total.load(Ordering::Relaxed),
            cancellations_total: self.cancellations_total.load(Ordering::Relaxed),
            fallback_ratio: if turns == 0 {
                0.0
            } else {
                fallbacks as f64 / turns as f64
            },
        }
    }
}

/// JSON logs on stderr so they never mix with the chat transcript on stdout.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=warn,safar_agents=warn,safar_ml=warn",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_fallback_ratio() {
        let metrics = SessionMetrics::default();
        assert_eq!(metrics.snapshot().fallback_ratio, 0.0);

        for _ in 0..4 {
            metrics.inc_turn();
        }
        metrics.inc_fallback();
        metrics.inc_booking();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.turns_total, 4);
        assert_eq!(snapshot.bookings_total, 1);
        assert_eq!(snapshot.fallback_ratio, 0.25);
    }
}
