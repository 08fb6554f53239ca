pub mod aggregator;
pub mod board;
pub mod error;
pub mod price;
pub mod sources;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{AggregationScope, AggregatorConfig, StatsAggregator, VaultMetrics};
pub use board::{MetricsBoard, MetricsBoards, MetricsState, SessionId};
pub use error::StatsError;
pub use sources::{
    LedgerFilter, LedgerStore, OptionsFilter, OptionsStore, PriceFeed, UserDirectory, VaultSources,
};
pub use store::PgVaultStore;
