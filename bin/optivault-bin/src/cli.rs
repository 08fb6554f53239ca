use clap::{Parser, ValueEnum};

use optivault_stats::AggregationScope;
use optivault_types::Asset;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct OptivaultCli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// OTEL collector endpoint
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// API host
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub api_host: String,

    /// API port
    #[arg(long, env = "API_PORT", default_value = "8080")]
    pub api_port: u16,

    /// Whether TVL and active options cover the whole vault or only the requesting user
    #[arg(long, env = "AGGREGATION_SCOPE", value_enum, default_value_t = ScopeArg::Global)]
    pub aggregation_scope: ScopeArg,

    /// Asset the vault is denominated in
    #[arg(long, env = "VAULT_ASSET", default_value = "BTC")]
    pub vault_asset: Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Global,
    PerUser,
}

impl From<ScopeArg> for AggregationScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Global => Self::Global,
            ScopeArg::PerUser => Self::PerUser,
        }
    }
}
