use std::sync::Arc;

use deadpool_diesel::postgres::Pool;
use rust_decimal::Decimal;

use optivault_db::{
    OptivaultPool,
    models::{Deposit, User, VaultOption, Withdrawal},
};
use optivault_quoting::AssetPrices;
use optivault_types::{LedgerEntry, LedgerKind, OptionRecord, UserId, WalletAddress};

use crate::{
    error::StatsError,
    sources::{
        LedgerFilter, LedgerStore, OptionsFilter, OptionsStore, UserDirectory, VaultSources,
    },
};

/// Postgres-backed users, options and ledger.
#[derive(Clone)]
pub struct PgVaultStore {
    pool: Pool,
}

impl PgVaultStore {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Wire the store and a price cache into [`VaultSources`].
    pub fn into_sources(self, prices: AssetPrices) -> VaultSources {
        let store = Arc::new(self);
        VaultSources {
            users: store.clone(),
            options: store.clone(),
            ledger: store,
            prices: Arc::new(prices),
        }
    }
}

fn status_strings(filter: &OptionsFilter) -> Vec<String> {
    filter
        .statuses
        .iter()
        .map(|status| status.as_str().to_string())
        .collect()
}

#[async_trait::async_trait]
impl UserDirectory for PgVaultStore {
    async fn lookup(&self, wallet: &WalletAddress) -> Result<Option<UserId>, StatsError> {
        let wallet_clone = wallet.clone();
        let result = self
            .pool
            .interact_with_context(format!("find user by wallet: {wallet}"), move |conn| {
                User::find_by_wallet(&wallet_clone, conn)
            })
            .await;

        match result {
            Ok(user) => Ok(Some(user.user_id())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl OptionsStore for PgVaultStore {
    async fn query(&self, filter: &OptionsFilter) -> Result<Vec<OptionRecord>, StatsError> {
        let user_id = filter.user_id.map(|id| id.0);
        let statuses = status_strings(filter);
        let created_after = filter.created_after;

        let options = self
            .pool
            .interact_with_context("query options".to_string(), move |conn| {
                VaultOption::find_filtered(user_id, statuses, created_after, conn)
            })
            .await?;

        Ok(options.into_iter().map(OptionRecord::from).collect())
    }

    async fn count(&self, filter: &OptionsFilter) -> Result<u64, StatsError> {
        let user_id = filter.user_id.map(|id| id.0);
        let statuses = status_strings(filter);
        let created_after = filter.created_after;

        let count = self
            .pool
            .interact_with_context("count options".to_string(), move |conn| {
                VaultOption::count_filtered(user_id, statuses, created_after, conn)
            })
            .await?;

        u64::try_from(count)
            .map_err(|_| StatsError::InvalidData(format!("Negative option count {count}")))
    }
}

#[async_trait::async_trait]
impl LedgerStore for PgVaultStore {
    async fn query(
        &self,
        kind: LedgerKind,
        filter: &LedgerFilter,
    ) -> Result<Vec<Decimal>, StatsError> {
        let status = filter.status;
        let user_id = filter.user_id.map(|id| id.0);
        let operation = format!("sum {} amounts", kind.as_str());

        let amounts = match kind {
            LedgerKind::Deposit => {
                self.pool
                    .interact_with_context(operation, move |conn| {
                        Deposit::amounts_by_status(status, user_id, conn)
                    })
                    .await?
            }
            LedgerKind::Withdrawal => {
                self.pool
                    .interact_with_context(operation, move |conn| {
                        Withdrawal::amounts_by_status(status, user_id, conn)
                    })
                    .await?
            }
        };

        Ok(amounts)
    }

    async fn history(&self, user_id: UserId, limit: usize) -> Result<Vec<LedgerEntry>, StatsError> {
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let (deposits, withdrawals) = tokio::try_join!(
            self.pool
                .interact_with_context(format!("find deposits of user {user_id}"), move |conn| {
                    Deposit::find_by_user(user_id.0, row_limit, conn)
                }),
            self.pool
                .interact_with_context(format!("find withdrawals of user {user_id}"), move |conn| {
                    Withdrawal::find_by_user(user_id.0, row_limit, conn)
                }),
        )?;

        Ok(merge_history(deposits, withdrawals, limit))
    }
}

/// Interleave both ledgers newest first and keep at most `limit` entries.
fn merge_history(
    deposits: Vec<Deposit>,
    withdrawals: Vec<Withdrawal>,
    limit: usize,
) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = deposits
        .into_iter()
        .map(LedgerEntry::from)
        .chain(withdrawals.into_iter().map(LedgerEntry::from))
        .collect();

    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::dec;

    use optivault_types::LedgerStatus;

    use super::*;

    fn deposit(id: i32, hours_ago: i64) -> Deposit {
        Deposit {
            id,
            user_id: 1,
            amount: dec!(10),
            status: "deposit".to_string(),
            tx_hash: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap()
                - Duration::hours(hours_ago),
        }
    }

    fn withdrawal(id: i32, hours_ago: i64) -> Withdrawal {
        Withdrawal {
            id,
            user_id: 1,
            amount: dec!(4),
            status: "pending".to_string(),
            tx_hash: Some("0xabc".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap()
                - Duration::hours(hours_ago),
        }
    }

    #[test]
    fn test_merge_history_orders_newest_first_and_truncates() {
        let merged = merge_history(
            vec![deposit(1, 5), deposit(2, 1)],
            vec![withdrawal(1, 3), withdrawal(2, 10)],
            3,
        );

        let kinds: Vec<_> = merged.iter().map(|entry| entry.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LedgerKind::Deposit,
                LedgerKind::Withdrawal,
                LedgerKind::Deposit
            ]
        );
        assert_eq!(merged[0].status, Some(LedgerStatus::Confirmed));
        assert_eq!(merged[1].status, Some(LedgerStatus::Pending));
        assert_eq!(merged[1].tx_hash.as_deref(), Some("0xabc"));
    }
}
