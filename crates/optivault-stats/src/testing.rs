//! In-memory collaborators for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use optivault_db::DatabaseError;
use optivault_types::{
    Asset, LedgerEntry, LedgerKind, LedgerStatus, OptionRecord, OptionStatus, UserId,
    WalletAddress,
};

use crate::{
    error::StatsError,
    sources::{
        LedgerFilter, LedgerStore, OptionsFilter, OptionsStore, PriceFeed, UserDirectory,
        VaultSources,
    },
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TestWallet(pub &'static str, pub UserId);

pub(crate) const ALICE: TestWallet = TestWallet(
    "0x00000000000000000000000000000000000000000000000000000000000a11ce",
    UserId(1),
);
pub(crate) const BOB: TestWallet = TestWallet("0xb0b", UserId(2));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailPoint {
    Lookup,
    OptionsQuery,
    OptionsCount,
    Deposits,
    Withdrawals,
    Price,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryVault {
    users: Vec<(WalletAddress, UserId)>,
    options: Vec<OptionRecord>,
    ledger: Vec<LedgerEntry>,
    price: Decimal,
    fail_at: Option<FailPoint>,
}

impl MemoryVault {
    pub(crate) fn new(price: Decimal) -> Self {
        Self {
            price,
            ..Self::default()
        }
    }

    fn register(&mut self, wallet: TestWallet) {
        let address = WalletAddress::parse(wallet.0).expect("test wallet must be valid");
        if !self.users.iter().any(|(_, id)| *id == wallet.1) {
            self.users.push((address, wallet.1));
        }
    }

    fn push_option(
        mut self,
        wallet: TestWallet,
        status: Option<OptionStatus>,
        premium: Decimal,
        amount: Decimal,
        expiry: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.register(wallet);
        self.options.push(OptionRecord {
            id: self.options.len() as i32 + 1,
            user_id: wallet.1,
            premium,
            amount,
            strike_price: None,
            expiry,
            status,
            created_at,
        });
        self
    }

    pub(crate) fn with_option(
        self,
        wallet: TestWallet,
        premium: Decimal,
        status: OptionStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.push_option(wallet, Some(status), premium, Decimal::ZERO, None, created_at)
    }

    /// Active option locking `amount` until `expiry`, written a week before it.
    pub(crate) fn with_written_option(
        self,
        wallet: TestWallet,
        premium: Decimal,
        amount: Decimal,
        expiry: DateTime<Utc>,
    ) -> Self {
        let created_at = expiry - Duration::days(7);
        self.push_option(
            wallet,
            Some(OptionStatus::Active),
            premium,
            amount,
            Some(expiry),
            created_at,
        )
    }

    /// Option whose stored status the service does not know.
    pub(crate) fn with_unrecognized_option(
        self,
        wallet: TestWallet,
        premium: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.push_option(wallet, None, premium, Decimal::ZERO, None, created_at)
    }

    fn with_entry(
        mut self,
        kind: LedgerKind,
        wallet: TestWallet,
        amount: Decimal,
        status: LedgerStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.register(wallet);
        self.ledger.push(LedgerEntry {
            id: self.ledger.len() as i32 + 1,
            user_id: wallet.1,
            kind,
            amount,
            status: Some(status),
            tx_hash: None,
            created_at,
        });
        self
    }

    pub(crate) fn with_deposit(
        self,
        wallet: TestWallet,
        amount: Decimal,
        status: LedgerStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.with_entry(LedgerKind::Deposit, wallet, amount, status, created_at)
    }

    pub(crate) fn with_withdrawal(
        self,
        wallet: TestWallet,
        amount: Decimal,
        status: LedgerStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.with_entry(LedgerKind::Withdrawal, wallet, amount, status, created_at)
    }

    pub(crate) const fn failing_at(mut self, fail_point: FailPoint) -> Self {
        self.fail_at = Some(fail_point);
        self
    }

    pub(crate) fn into_sources(self) -> VaultSources {
        let vault = Arc::new(self);
        VaultSources {
            users: vault.clone(),
            options: vault.clone(),
            ledger: vault.clone(),
            prices: vault,
        }
    }

    fn check(&self, fail_point: FailPoint) -> Result<(), StatsError> {
        if self.fail_at == Some(fail_point) {
            let err = DatabaseError::query_error(format!("{fail_point:?}"), "injected failure");
            return Err(err.into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryVault {
    async fn lookup(&self, wallet: &WalletAddress) -> Result<Option<UserId>, StatsError> {
        self.check(FailPoint::Lookup)?;
        Ok(self
            .users
            .iter()
            .find(|(address, _)| address == wallet)
            .map(|(_, id)| *id))
    }
}

#[async_trait::async_trait]
impl OptionsStore for MemoryVault {
    async fn query(&self, filter: &OptionsFilter) -> Result<Vec<OptionRecord>, StatsError> {
        self.check(FailPoint::OptionsQuery)?;
        let mut options: Vec<_> = self
            .options
            .iter()
            .filter(|option| filter.matches(option))
            .cloned()
            .collect();
        options.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(options)
    }

    async fn count(&self, filter: &OptionsFilter) -> Result<u64, StatsError> {
        self.check(FailPoint::OptionsCount)?;
        Ok(self
            .options
            .iter()
            .filter(|option| filter.matches(option))
            .count() as u64)
    }
}

#[async_trait::async_trait]
impl LedgerStore for MemoryVault {
    async fn query(
        &self,
        kind: LedgerKind,
        filter: &LedgerFilter,
    ) -> Result<Vec<Decimal>, StatsError> {
        self.check(match kind {
            LedgerKind::Deposit => FailPoint::Deposits,
            LedgerKind::Withdrawal => FailPoint::Withdrawals,
        })?;
        Ok(self
            .ledger
            .iter()
            .filter(|entry| entry.kind == kind && filter.matches(entry))
            .map(|entry| entry.amount)
            .collect())
    }

    async fn history(&self, user_id: UserId, limit: usize) -> Result<Vec<LedgerEntry>, StatsError> {
        let mut entries: Vec<_> = self
            .ledger
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl PriceFeed for MemoryVault {
    async fn current_price(&self, _asset: Asset) -> Result<Decimal, StatsError> {
        self.check(FailPoint::Price)?;
        Ok(self.price)
    }
}
