pub mod docs;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod helpers;
pub mod router;

use std::{env, net::SocketAddr, path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::cors::CorsLayer;

use optivault_stats::{MetricsBoards, StatsAggregator};
use pragma_common::services::{Service, ServiceRunner};

use docs::ApiDoc;
use router::api_router;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<StatsAggregator>,
    pub boards: MetricsBoards,
}

impl AppState {
    pub fn new(aggregator: StatsAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            boards: MetricsBoards::new(),
        }
    }
}

/// Rate limiting knobs, read from `RATE_LIMIT_*` env variables.
#[derive(Debug, Clone, Copy)]
struct RateLimit {
    enabled: bool,
    per_second: u64,
    burst_size: u32,
    cleanup_every: Duration,
}

impl RateLimit {
    fn from_env() -> Self {
        fn var<T: std::str::FromStr>(key: &str, default: T) -> T {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Self {
            enabled: var("RATE_LIMIT_ENABLED", true),
            per_second: var("RATE_LIMIT_PER_SECOND", 2),
            burst_size: var("RATE_LIMIT_BURST_SIZE", 5),
            cleanup_every: Duration::from_secs(var("RATE_LIMIT_CLEANUP_INTERVAL_SECS", 60)),
        }
    }
}

pub struct ApiService {
    state: AppState,
    host: String,
    port: u16,
}

impl ApiService {
    pub fn new(state: AppState, host: &str, port: u16) -> Self {
        Self {
            state,
            host: host.to_owned(),
            port,
        }
    }
}

#[async_trait::async_trait]
impl Service for ApiService {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        ApiDoc::generate_openapi_json(Path::new("."))?;

        let socket_addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid API address {}:{}", self.host, self.port))?;
        let state = self.state.clone();
        let rate_limit = RateLimit::from_env();

        runner.spawn_loop(move |ctx| async move {
            let listener = TcpListener::bind(socket_addr).await?;

            #[allow(clippy::default_constructed_unit_structs)]
            let mut app = api_router::<ApiDoc>()
                .with_state(state)
                .layer(OtelAxumLayer::default())
                .layer(OtelInResponseLayer::default());

            if rate_limit.enabled {
                let governor_conf = GovernorConfigBuilder::default()
                    .per_second(rate_limit.per_second)
                    .burst_size(rate_limit.burst_size)
                    .use_headers()
                    .finish()
                    .context("Invalid rate limit configuration")?;

                // The limiter keeps one entry per client IP, prune it until shutdown.
                let limiter = governor_conf.limiter().clone();
                let token = ctx.token.clone();
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(rate_limit.cleanup_every);
                    loop {
                        tokio::select! {
                            _ = ticker.tick() => {
                                let tracked_clients = limiter.len();
                                tracing::debug!(tracked_clients, "Pruning rate limiter");
                                limiter.retain_recent();
                            }
                            () = token.cancelled() => break,
                        }
                    }
                });

                app = app.layer(GovernorLayer::new(governor_conf));
            } else {
                tracing::info!("Rate limiting disabled via env");
            }

            let app = app.layer(CorsLayer::permissive());

            tracing::info!("🧩 API started at http://{}", socket_addr);

            let token = ctx.token.clone();
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
            .context("😱 API server stopped!")
        });

        Ok(())
    }
}
