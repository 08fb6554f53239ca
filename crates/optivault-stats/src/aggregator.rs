use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, dec};

use optivault_metrics::{ComputationOutcome, StatsMetrics};
use optivault_types::{
    Asset, LedgerKind, LedgerStatus, OptionRecord, OptionStatus, UserId, WalletAddress,
};

use crate::{
    error::StatsError,
    sources::{LedgerFilter, OptionsFilter, VaultSources},
};

const DAYS_PER_YEAR: Decimal = dec!(365);
const PERCENT: Decimal = dec!(100);

/// Which records feed TVL and the active options figures (count, locked
/// collateral, next expiry).
///
/// Premium figures are always computed for the requesting user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregationScope {
    /// Every confirmed transaction and active option of the vault.
    #[default]
    Global,
    /// Only the requesting user's transactions and options.
    PerUser,
}

impl AggregationScope {
    const fn user_filter(self, user_id: UserId) -> Option<UserId> {
        match self {
            Self::Global => None,
            Self::PerUser => Some(user_id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregatorConfig {
    pub scope: AggregationScope,
    /// Asset the vault is denominated in, used to value TVL in USD.
    pub asset: Asset,
}

/// Snapshot of the figures shown on the vault dashboard.
///
/// The default value is the zeroed snapshot served for unknown wallets and
/// failed computations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultMetrics {
    pub tvl: Decimal,
    pub active_options_count: u64,
    pub total_premium: Decimal,
    pub daily_premium_growth: Decimal,
    /// Last 24h premium annualized against TVL, in percent.
    pub apy: Decimal,
    pub token_price: Decimal,
    pub tvl_usd: Decimal,
    /// Collateral held by active options.
    pub locked_in_options: Decimal,
    /// `locked_in_options` as a percentage of TVL.
    pub locked_in_options_pct: Decimal,
    /// Earliest expiry still ahead among active options.
    pub next_expiry: Option<DateTime<Utc>>,
}

impl VaultMetrics {
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// `daily_premium × 365 × 100 / tvl`, or zero when there is nothing locked.
pub fn annualized_yield(daily_premium: Decimal, tvl: Decimal) -> Result<Decimal, StatsError> {
    if tvl <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let yearly = daily_premium
        .checked_mul(DAYS_PER_YEAR)
        .ok_or_else(|| StatsError::InvalidData("APY computation overflowed".to_string()))?;
    share_of_tvl(yearly, tvl, "APY")
}

/// `part × 100 / tvl`, zero when TVL is not positive.
fn share_of_tvl(part: Decimal, tvl: Decimal, what: &str) -> Result<Decimal, StatsError> {
    if tvl <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    part.checked_mul(PERCENT)
        .and_then(|pct| pct.checked_div(tvl))
        .ok_or_else(|| StatsError::InvalidData(format!("{what} computation overflowed")))
}

fn next_expiry(options: &[OptionRecord], as_of: DateTime<Utc>) -> Option<DateTime<Utc>> {
    options
        .iter()
        .filter_map(|option| option.expiry)
        .filter(|expiry| *expiry > as_of)
        .min()
}

fn checked_sum<'a>(
    values: impl IntoIterator<Item = &'a Decimal>,
    what: &str,
) -> Result<Decimal, StatsError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| StatsError::InvalidData(format!("Sum of {what} overflowed")))
}

/// Turns deposits, withdrawals, options and a price into [`VaultMetrics`].
pub struct StatsAggregator {
    sources: VaultSources,
    config: AggregatorConfig,
    metrics: Option<Arc<StatsMetrics>>,
}

impl StatsAggregator {
    pub const DAILY_WINDOW_HOURS: i64 = 24;

    pub const fn new(sources: VaultSources, config: AggregatorConfig) -> Self {
        Self {
            sources,
            config,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<StatsMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub const fn sources(&self) -> &VaultSources {
        &self.sources
    }

    /// Compute the dashboard metrics of `wallet` as of `as_of`.
    ///
    /// Never fails: unknown wallets and any read failure both yield
    /// [`VaultMetrics::zeroed`]. Failures are logged.
    pub async fn compute(&self, wallet: &str, as_of: DateTime<Utc>) -> VaultMetrics {
        match self.try_compute(wallet, as_of).await {
            Ok(Some(metrics)) => {
                self.record(ComputationOutcome::Ok);
                metrics
            }
            Ok(None) => {
                tracing::debug!(wallet = %wallet, "Unknown wallet, serving zeroed metrics");
                self.record(ComputationOutcome::UnknownWallet);
                VaultMetrics::zeroed()
            }
            Err(e) => {
                tracing::error!(
                    wallet = %wallet,
                    error = %e,
                    "[StatsAggregator] 🔴 Failed to compute vault metrics"
                );
                self.record(ComputationOutcome::Failed);
                VaultMetrics::zeroed()
            }
        }
    }

    /// Fallible core of [`StatsAggregator::compute`]. `Ok(None)` means the
    /// wallet does not resolve to a user.
    pub async fn try_compute(
        &self,
        wallet: &str,
        as_of: DateTime<Utc>,
    ) -> Result<Option<VaultMetrics>, StatsError> {
        let Some(wallet) = WalletAddress::parse(wallet) else {
            return Ok(None);
        };
        let Some(user_id) = self.sources.users.lookup(&wallet).await? else {
            return Ok(None);
        };

        let scoped_user = self.config.scope.user_filter(user_id);

        let earning = OptionsFilter {
            user_id: Some(user_id),
            statuses: OptionStatus::EARNING.to_vec(),
            created_after: None,
        };
        let earned_today = OptionsFilter {
            created_after: Some(as_of - Duration::hours(Self::DAILY_WINDOW_HOURS)),
            ..earning.clone()
        };
        let active = OptionsFilter {
            user_id: scoped_user,
            statuses: vec![OptionStatus::Active],
            created_after: None,
        };
        let confirmed = LedgerFilter {
            status: LedgerStatus::Confirmed,
            user_id: scoped_user,
        };

        let (
            earning_options,
            daily_options,
            active_options,
            deposits,
            withdrawals,
            active_count,
            token_price,
        ) = tokio::try_join!(
            self.sources.options.query(&earning),
            self.sources.options.query(&earned_today),
            self.sources.options.query(&active),
            self.sources.ledger.query(LedgerKind::Deposit, &confirmed),
            self.sources.ledger.query(LedgerKind::Withdrawal, &confirmed),
            self.sources.options.count(&active),
            self.sources.prices.current_price(self.config.asset),
        )?;

        let total_premium = checked_sum(earning_options.iter().map(|o| &o.premium), "premiums")?;
        let daily_premium_growth =
            checked_sum(daily_options.iter().map(|o| &o.premium), "daily premiums")?;
        let tvl = checked_sum(&deposits, "deposits")?
            .checked_sub(checked_sum(&withdrawals, "withdrawals")?)
            .ok_or_else(|| StatsError::InvalidData("TVL computation overflowed".to_string()))?;
        let apy = annualized_yield(daily_premium_growth, tvl)?;
        let tvl_usd = tvl
            .checked_mul(token_price)
            .ok_or_else(|| StatsError::InvalidData("TVL valuation overflowed".to_string()))?;
        let locked_in_options =
            checked_sum(active_options.iter().map(|o| &o.amount), "locked collateral")?;
        let locked_in_options_pct = share_of_tvl(locked_in_options, tvl, "Locked share")?;

        Ok(Some(VaultMetrics {
            tvl,
            active_options_count: active_count,
            total_premium,
            daily_premium_growth,
            apy,
            token_price,
            tvl_usd,
            locked_in_options,
            locked_in_options_pct,
            next_expiry: next_expiry(&active_options, as_of),
        }))
    }

    pub(crate) fn record_stale_result(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_stale_result();
        }
    }

    fn record(&self, outcome: ComputationOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_computation(outcome);
        }
    }
}
