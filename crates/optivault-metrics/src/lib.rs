use std::sync::Arc;

use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Debug)]
pub struct MetricsRegistry {
    pub stats: Arc<StatsMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            stats: StatsMetrics::new(),
        })
    }
}

#[derive(Debug)]
pub struct StatsMetrics {
    computations: Counter<u64>,
    stale_results: Counter<u64>,
}

impl StatsMetrics {
    pub fn new() -> Arc<Self> {
        let meter = global::meter("optivault-api");
        let computations = meter
            .u64_counter("stats_computations_total")
            .with_description("Number of vault metrics computations by outcome")
            .with_unit("count")
            .init();

        let stale_results = meter
            .u64_counter("stats_stale_results_total")
            .with_description("Number of computed metrics superseded by a newer trigger")
            .with_unit("count")
            .init();

        Arc::new(Self {
            computations,
            stale_results,
        })
    }

    pub fn record_computation(&self, outcome: ComputationOutcome) {
        self.computations
            .add(1, &[KeyValue::new("outcome", outcome.as_str())]);
    }

    pub fn record_stale_result(&self) {
        self.stale_results.add(1, &[]);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputationOutcome {
    Ok,
    UnknownWallet,
    Failed,
}

impl ComputationOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::UnknownWallet => "unknown_wallet",
            Self::Failed => "failed",
        }
    }
}
