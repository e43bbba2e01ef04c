//! Observability: dispatch counters and tracing setup.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters recorded by the dispatcher.
#[derive(Debug, Default)]
pub struct Metrics {
    requests_dispatched: AtomicU64,
    redirects_issued: AtomicU64,
    errors_dispatched: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_dispatched(&self) {
        self.requests_dispatched.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "requests_dispatched", "Metric incremented");
    }

    pub fn redirect_issued(&self) {
        self.redirects_issued.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "redirects_issued", "Metric incremented");
    }

    pub fn error_dispatched(&self) {
        self.errors_dispatched.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "errors_dispatched", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_dispatched: self.requests_dispatched.load(Ordering::Relaxed),
            redirects_issued: self.redirects_issued.load(Ordering::Relaxed),
            errors_dispatched: self.errors_dispatched.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MetricsSnapshot {
    pub requests_dispatched: u64,
    pub redirects_issued: u64,
    pub errors_dispatched: u64,
}

/// Installs the default tracing subscriber with env-filter support.
/// Intended for host binaries; call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
