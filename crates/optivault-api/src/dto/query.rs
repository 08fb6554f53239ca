use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for the metrics endpoint
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct MetricsQuery {
    /// Refresh counter of the caller's session. Defaults to one past the
    /// session's last published trigger.
    pub trigger: Option<u64>,
    /// Client chosen session id, 1 to 64 of `[A-Za-z0-9_-]`. Without one the
    /// metrics are computed and returned without being published.
    pub session: Option<String>,
}

/// Query parameters for the latest metrics endpoint
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct LatestMetricsQuery {
    /// Session whose last published metrics are returned
    pub session: Option<String>,
}

/// Query parameters for the options endpoint
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct OptionsQuery {
    /// Comma separated statuses, defaults to `active`
    pub status: Option<String>,
}

/// Query parameters for the transaction history endpoint
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct TransactionsQuery {
    /// Maximum number of transactions, between 1 and 200 (default 50)
    pub limit: Option<usize>,
}
