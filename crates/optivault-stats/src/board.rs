use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use moka::future::Cache;
use tokio::sync::watch;

use optivault_types::WalletAddress;

use crate::aggregator::{StatsAggregator, VaultMetrics};

/// What one dashboard session currently shows for a wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsState {
    /// Trigger the published metrics were computed for.
    pub trigger: u64,
    pub metrics: VaultMetrics,
    /// A newer trigger than `trigger` is still being computed.
    pub loading: bool,
    /// Time the published metrics were computed at, `None` before the first
    /// publication.
    pub as_of: Option<DateTime<Utc>>,
}

/// Latest metrics of one session, keyed by that session's refresh trigger.
///
/// Computations may complete out of order. A result is only published when
/// its trigger is at least the one already on the board, so a slow response
/// for an old trigger never replaces a newer one.
#[derive(Debug)]
pub struct MetricsBoard {
    state: watch::Sender<MetricsState>,
    newest_requested: AtomicU64,
}

impl MetricsBoard {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MetricsState::default());
        Self {
            state,
            newest_requested: AtomicU64::new(0),
        }
    }

    /// Mark the start of a computation for `trigger`.
    pub fn begin(&self, trigger: u64) {
        self.newest_requested.fetch_max(trigger, Ordering::AcqRel);
        self.state.send_if_modified(|state| {
            if trigger > state.trigger && !state.loading {
                state.loading = true;
                return true;
            }
            false
        });
    }

    /// Publish the result computed for `trigger` at `as_of`. Returns `false`
    /// when a newer trigger was already published and the result is dropped.
    pub fn publish(&self, trigger: u64, as_of: DateTime<Utc>, metrics: VaultMetrics) -> bool {
        self.state.send_if_modified(|state| {
            if trigger < state.trigger {
                return false;
            }
            state.trigger = trigger;
            state.metrics = metrics;
            state.as_of = Some(as_of);
            state.loading = self.newest_requested.load(Ordering::Acquire) > trigger;
            true
        })
    }

    pub fn latest(&self) -> MetricsState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricsState> {
        self.state.subscribe()
    }

    /// Compute `wallet`'s metrics for `trigger` and publish them.
    /// Returns whatever the board shows afterwards.
    pub async fn refresh(
        &self,
        aggregator: &StatsAggregator,
        wallet: &WalletAddress,
        trigger: u64,
        as_of: DateTime<Utc>,
    ) -> MetricsState {
        self.begin(trigger);
        let metrics = aggregator.compute(wallet.as_str(), as_of).await;

        if !self.publish(trigger, as_of, metrics) {
            tracing::debug!(
                wallet = %wallet,
                trigger,
                "Dropping metrics computed for a superseded trigger"
            );
            aggregator.record_stale_result();
        }

        self.latest()
    }
}

impl Default for MetricsBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque id of one dashboard session (a browser tab, an app instance).
/// Triggers are only ever compared within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    const MAX_LEN: usize = 64;

    /// Accepts 1 to 64 ASCII letters, digits, `-` or `_`.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One [`MetricsBoard`] per wallet and session. Boards nobody asked about
/// for a while are evicted.
#[derive(Clone)]
pub struct MetricsBoards(Cache<(WalletAddress, SessionId), Arc<MetricsBoard>>);

impl MetricsBoards {
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
    const MAX_BOARDS: u64 = 100_000;

    pub fn new() -> Self {
        Self(
            Cache::builder()
                .max_capacity(Self::MAX_BOARDS)
                .time_to_idle(Self::IDLE_TIMEOUT)
                .build(),
        )
    }

    pub async fn board(&self, wallet: &WalletAddress, session: &SessionId) -> Arc<MetricsBoard> {
        self.0
            .get_with((wallet.clone(), session.clone()), async {
                Arc::new(MetricsBoard::new())
            })
            .await
    }

    /// Board of `wallet` in `session` if one exists, without creating it.
    pub async fn get(
        &self,
        wallet: &WalletAddress,
        session: &SessionId,
    ) -> Option<Arc<MetricsBoard>> {
        self.0.get(&(wallet.clone(), session.clone())).await
    }
}

impl Default for MetricsBoards {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use rust_decimal::{Decimal, dec};

    use optivault_types::{LedgerStatus, OptionStatus};

    use super::*;
    use crate::{
        aggregator::{AggregationScope, AggregatorConfig},
        testing::{ALICE, MemoryVault},
    };

    fn metrics_with_tvl(tvl: Decimal) -> VaultMetrics {
        VaultMetrics {
            tvl,
            ..VaultMetrics::default()
        }
    }

    fn session(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    fn global_aggregator(price: Decimal, now: DateTime<Utc>) -> StatsAggregator {
        let vault = MemoryVault::new(price)
            .with_deposit(ALICE, dec!(100), LedgerStatus::Confirmed, now)
            .with_option(
                ALICE,
                dec!(4),
                OptionStatus::Active,
                now - ChronoDuration::hours(1),
            );
        StatsAggregator::new(
            vault.into_sources(),
            AggregatorConfig {
                scope: AggregationScope::Global,
                ..AggregatorConfig::default()
            },
        )
    }

    #[test]
    fn test_out_of_order_results_are_dropped() {
        let now = Utc::now();
        let board = MetricsBoard::new();
        board.begin(1);
        board.begin(2);

        assert!(board.publish(2, now, metrics_with_tvl(dec!(20))));
        assert!(!board.publish(1, now, metrics_with_tvl(dec!(10))));

        let latest = board.latest();
        assert_eq!(latest.trigger, 2);
        assert_eq!(latest.metrics.tvl, dec!(20));
        assert!(!latest.loading);
    }

    #[test]
    fn test_loading_clears_only_when_newest_trigger_publishes() {
        let now = Utc::now();
        let board = MetricsBoard::new();
        board.begin(1);
        assert!(board.latest().loading);

        board.begin(2);
        assert!(board.publish(1, now, metrics_with_tvl(dec!(10))));
        let latest = board.latest();
        assert_eq!(latest.trigger, 1);
        assert!(latest.loading);

        assert!(board.publish(2, now, metrics_with_tvl(dec!(20))));
        assert!(!board.latest().loading);
    }

    #[test]
    fn test_same_trigger_can_republish() {
        let now = Utc::now();
        let board = MetricsBoard::new();
        board.begin(3);
        assert!(board.publish(3, now, metrics_with_tvl(dec!(1))));
        assert!(board.publish(3, now, metrics_with_tvl(dec!(2))));
        assert_eq!(board.latest().metrics.tvl, dec!(2));
    }

    #[test]
    fn test_published_as_of_is_the_computation_time() {
        let computed_at = Utc::now() - ChronoDuration::minutes(5);
        let board = MetricsBoard::new();
        assert_eq!(board.latest().as_of, None);

        board.begin(1);
        board.publish(1, computed_at, metrics_with_tvl(dec!(1)));
        assert_eq!(board.latest().as_of, Some(computed_at));

        // A dropped result leaves the previous time in place.
        assert!(!board.publish(0, Utc::now(), metrics_with_tvl(dec!(9))));
        assert_eq!(board.latest().as_of, Some(computed_at));
    }

    #[tokio::test]
    async fn test_subscribers_see_replacements() {
        let board = MetricsBoard::new();
        let mut rx = board.subscribe();

        board.begin(1);
        board.publish(1, Utc::now(), metrics_with_tvl(dec!(5)));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().metrics.tvl, dec!(5));
    }

    #[test]
    fn test_session_ids() {
        assert!(SessionId::parse("tab-1_A").is_some());
        assert!(SessionId::parse(&"a".repeat(64)).is_some());
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse(&"a".repeat(65)).is_none());
        assert!(SessionId::parse("tab 1").is_none());
        assert!(SessionId::parse("tab/1").is_none());
    }

    #[tokio::test]
    async fn test_refresh_publishes_computed_metrics() {
        let now = Utc::now();
        let aggregator = global_aggregator(dec!(1), now);
        let boards = MetricsBoards::new();
        let wallet = WalletAddress::parse(ALICE.0).unwrap();
        let tab = session("tab");

        let board = boards.board(&wallet, &tab).await;
        let state = board.refresh(&aggregator, &wallet, 7, now).await;
        assert_eq!(state.trigger, 7);
        assert!(!state.loading);
        assert_eq!(state.as_of, Some(now));
        assert_eq!(state.metrics.tvl, dec!(100));
        assert_eq!(state.metrics.total_premium, dec!(4));

        // Same board is handed out again for the same wallet and session.
        let again = boards.board(&wallet, &tab).await;
        assert_eq!(again.latest(), state);

        // An older trigger computed late does not replace it.
        let stale = again
            .refresh(&aggregator, &wallet, 3, now + ChronoDuration::seconds(1))
            .await;
        assert_eq!(stale.trigger, 7);
        assert_eq!(stale.as_of, Some(now));
    }

    #[tokio::test]
    async fn test_sessions_with_overlapping_counters_each_see_fresh_results() {
        let now = Utc::now();
        let before = global_aggregator(dec!(1), now);
        let after = global_aggregator(dec!(2), now);
        let boards = MetricsBoards::new();
        let wallet = WalletAddress::parse(ALICE.0).unwrap();
        let (tab_a, tab_b) = (session("tab-a"), session("tab-b"));

        // Tab A has been open a while and is far ahead in its own count.
        let board_a = boards.board(&wallet, &tab_a).await;
        let a = board_a.refresh(&before, &wallet, 10, now).await;
        assert_eq!(a.trigger, 10);
        assert_eq!(a.metrics.token_price, dec!(1));

        // Tab B starts counting from scratch after the price moved.
        let later = now + ChronoDuration::seconds(30);
        let board_b = boards.board(&wallet, &tab_b).await;
        let b = board_b.refresh(&after, &wallet, 1, later).await;
        assert_eq!(b.trigger, 1);
        assert_eq!(b.metrics.token_price, dec!(2));
        assert_eq!(b.metrics.tvl_usd, dec!(200));
        assert_eq!(b.as_of, Some(later));

        // Tab A is left untouched by tab B's lower trigger.
        let a_again = boards.get(&wallet, &tab_a).await.unwrap().latest();
        assert_eq!(a_again, a);
    }

    #[tokio::test]
    async fn test_max_trigger_only_pins_its_own_session() {
        let now = Utc::now();
        let aggregator = global_aggregator(dec!(3), now);
        let boards = MetricsBoards::new();
        let wallet = WalletAddress::parse(ALICE.0).unwrap();
        let (greedy, honest) = (session("greedy"), session("honest"));

        let pinned = boards
            .board(&wallet, &greedy)
            .await
            .refresh(&aggregator, &wallet, u64::MAX, now)
            .await;
        assert_eq!(pinned.trigger, u64::MAX);

        let state = boards
            .board(&wallet, &honest)
            .await
            .refresh(&aggregator, &wallet, 1, now)
            .await;
        assert_eq!(state.trigger, 1);
        assert_eq!(state.metrics.token_price, dec!(3));
        assert!(boards.get(&wallet, &session("unseen")).await.is_none());
    }
}
