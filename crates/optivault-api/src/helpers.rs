use optivault_stats::{SessionId, StatsAggregator};
use optivault_types::{OptionStatus, UserId, WalletAddress};

use crate::errors::ApiError;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 200;

pub fn parse_wallet(address: &str) -> Result<WalletAddress, ApiError> {
    WalletAddress::parse(address)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid wallet address: {address}")))
}

pub fn parse_session(raw: &str) -> Result<SessionId, ApiError> {
    SessionId::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid session id: {raw}")))
}

/// Resolve `wallet` to its user, 404 when nobody registered it.
pub async fn resolve_user(
    aggregator: &StatsAggregator,
    wallet: &WalletAddress,
) -> Result<UserId, ApiError> {
    aggregator
        .sources()
        .users
        .lookup(wallet)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {wallet} not found")))
}

/// Parse a comma separated status list such as `active,executed`.
/// Empty or missing input means `active` only.
pub fn parse_statuses(raw: Option<&str>) -> Result<Vec<OptionStatus>, ApiError> {
    let mut statuses = Vec::new();
    for part in raw.unwrap_or_default().split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let status = OptionStatus::from_db_str(&part.to_ascii_lowercase())
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown option status: {part}")))?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }

    if statuses.is_empty() {
        statuses.push(OptionStatus::Active);
    }
    Ok(statuses)
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statuses() {
        assert_eq!(parse_statuses(None).unwrap(), vec![OptionStatus::Active]);
        assert_eq!(parse_statuses(Some(" , ")).unwrap(), vec![OptionStatus::Active]);
        assert_eq!(
            parse_statuses(Some("Active, executed,active")).unwrap(),
            vec![OptionStatus::Active, OptionStatus::Executed]
        );
        assert!(matches!(
            parse_statuses(Some("active,burnt")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_HISTORY_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(10_000)), MAX_HISTORY_LIMIT);
    }

    #[test]
    fn test_parse_wallet_rejects_garbage() {
        assert!(parse_wallet("0xABC").is_ok());
        assert!(matches!(parse_wallet("not-a-wallet"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_session() {
        assert_eq!(parse_session("tab-1").unwrap().as_str(), "tab-1");
        assert!(matches!(parse_session("two words"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_session(""), Err(ApiError::BadRequest(_))));
    }
}
