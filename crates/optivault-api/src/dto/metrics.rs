use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use optivault_stats::{MetricsState, VaultMetrics};

/// Dashboard figures. Decimals are strings to keep full precision.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VaultMetricsDto {
    pub tvl: String,
    pub active_options_count: u64,
    pub total_premium: String,
    pub daily_premium_growth: String,
    pub apy_pct: String,
    pub token_price: String,
    pub tvl_usd: String,
    /// Collateral held by the active options
    pub locked_in_options: String,
    pub locked_in_options_pct: String,
    /// Earliest expiry still ahead among the active options
    pub next_expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VaultMetricsResponse {
    pub address: String,
    /// When the metrics were computed, `null` if they never were
    pub as_of: Option<DateTime<Utc>>,
    /// Refresh trigger the metrics were computed for
    pub trigger: u64,
    /// Whether a newer trigger is still being computed
    pub loading: bool,
    pub metrics: VaultMetricsDto,
}

impl From<VaultMetrics> for VaultMetricsDto {
    fn from(metrics: VaultMetrics) -> Self {
        Self {
            tvl: metrics.tvl.to_string(),
            active_options_count: metrics.active_options_count,
            total_premium: metrics.total_premium.to_string(),
            daily_premium_growth: metrics.daily_premium_growth.to_string(),
            apy_pct: metrics.apy.round_dp(2).to_string(),
            token_price: metrics.token_price.to_string(),
            tvl_usd: metrics.tvl_usd.round_dp(2).to_string(),
            locked_in_options: metrics.locked_in_options.to_string(),
            locked_in_options_pct: metrics.locked_in_options_pct.round_dp(2).to_string(),
            next_expiry: metrics.next_expiry,
        }
    }
}

impl VaultMetricsResponse {
    pub fn from_state(address: String, state: MetricsState) -> Self {
        Self {
            address,
            as_of: state.as_of,
            trigger: state.trigger,
            loading: state.loading,
            metrics: state.metrics.into(),
        }
    }
}
