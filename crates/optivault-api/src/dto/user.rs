use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use optivault_types::{LedgerEntry, LedgerKind, LedgerStatus, OptionRecord, OptionStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserOption {
    pub id: i32,
    pub premium: String,
    /// Collateral locked by the option, in the vault asset
    pub amount: String,
    pub strike_price: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    /// `null` when the stored status is not recognized
    pub status: Option<OptionStatus>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserOptionsResponse {
    pub address: String,
    pub items: Vec<UserOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: LedgerKind,
    pub status: Option<LedgerStatus>,
    pub amount: String,
    pub tx_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserTransactionHistory {
    pub address: String,
    pub items: Vec<UserTransaction>,
}

impl From<OptionRecord> for UserOption {
    fn from(option: OptionRecord) -> Self {
        Self {
            id: option.id,
            premium: option.premium.to_string(),
            amount: option.amount.to_string(),
            strike_price: option.strike_price.map(|strike| strike.to_string()),
            expiry: option.expiry,
            status: option.status,
            created_at: option.created_at,
        }
    }
}

impl From<LedgerEntry> for UserTransaction {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            // Ids are only unique per table.
            id: format!("{}-{}", entry.kind.as_str(), entry.id),
            transaction_type: entry.kind,
            status: entry.status,
            amount: entry.amount.to_string(),
            tx_hash: entry.tx_hash,
            timestamp: entry.created_at,
        }
    }
}
