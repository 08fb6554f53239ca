mod cli;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::{
    services::{Service, ServiceGroup},
    telemetry::init_telemetry,
};

use optivault_api::{ApiService, AppState};
use optivault_db::{init_pool, run_migrations};
use optivault_metrics::MetricsRegistry;
use optivault_quoting::AssetPrices;
use optivault_stats::{AggregatorConfig, PgVaultStore, StatsAggregator};

use crate::cli::OptivaultCli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let OptivaultCli {
        database_url,
        otel_collector_endpoint,
        api_host,
        api_port,
        aggregation_scope,
        vault_asset,
    } = OptivaultCli::parse();

    let app_name = "optivault_api";
    if let Err(e) = init_telemetry(app_name, otel_collector_endpoint) {
        panic!("Could not init telemetry: {e}");
    }

    let pool = init_pool(app_name, &database_url)?;
    run_migrations(&pool).await?;

    let registry = MetricsRegistry::new();
    let config = AggregatorConfig {
        scope: aggregation_scope.into(),
        asset: vault_asset,
    };
    tracing::info!(scope = ?config.scope, asset = %config.asset, "📊 Vault stats configured");

    let sources = PgVaultStore::new(pool).into_sources(AssetPrices::default());
    let aggregator = StatsAggregator::new(sources, config).with_metrics(registry.stats.clone());

    let api_service = ApiService::new(AppState::new(aggregator), &api_host, api_port);

    ServiceGroup::default()
        .with(api_service)
        .start_and_drive_to_end()
        .await?;

    Ok(())
}
