//! Read-side contracts the aggregator depends on.
//!
//! Production wiring backs all of them with Postgres ([`crate::PgVaultStore`])
//! and Pyth quotes ([`optivault_quoting::AssetPrices`]).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use optivault_types::{
    Asset, LedgerEntry, LedgerKind, LedgerStatus, OptionRecord, OptionStatus, UserId,
    WalletAddress,
};

use crate::error::StatsError;

#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a wallet to its user. `Ok(None)` when the wallet is unknown.
    async fn lookup(&self, wallet: &WalletAddress) -> Result<Option<UserId>, StatsError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsFilter {
    pub user_id: Option<UserId>,
    pub statuses: Vec<OptionStatus>,
    /// Inclusive lower bound on `created_at`.
    pub created_after: Option<DateTime<Utc>>,
}

impl OptionsFilter {
    pub fn matches(&self, option: &OptionRecord) -> bool {
        self.user_id.is_none_or(|user_id| option.user_id == user_id)
            && option
                .status
                .is_some_and(|status| self.statuses.contains(&status))
            && self
                .created_after
                .is_none_or(|after| option.created_at >= after)
    }
}

#[async_trait::async_trait]
pub trait OptionsStore: Send + Sync {
    async fn query(&self, filter: &OptionsFilter) -> Result<Vec<OptionRecord>, StatsError>;

    async fn count(&self, filter: &OptionsFilter) -> Result<u64, StatsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerFilter {
    pub status: LedgerStatus,
    pub user_id: Option<UserId>,
}

impl LedgerFilter {
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        entry.status == Some(self.status)
            && self.user_id.is_none_or(|user_id| entry.user_id == user_id)
    }
}

#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Amounts of every `kind` entry matching `filter`.
    async fn query(
        &self,
        kind: LedgerKind,
        filter: &LedgerFilter,
    ) -> Result<Vec<Decimal>, StatsError>;

    /// Deposits and withdrawals of one user, newest first, at most `limit`.
    async fn history(&self, user_id: UserId, limit: usize) -> Result<Vec<LedgerEntry>, StatsError>;
}

#[async_trait::async_trait]
pub trait PriceFeed: Send + Sync {
    async fn current_price(&self, asset: Asset) -> Result<Decimal, StatsError>;
}

/// Every collaborator needed to compute vault metrics.
#[derive(Clone)]
pub struct VaultSources {
    pub users: Arc<dyn UserDirectory>,
    pub options: Arc<dyn OptionsStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub prices: Arc<dyn PriceFeed>,
}
