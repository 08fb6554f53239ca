use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Internal identifier of a user row, resolved from a wallet address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Side of the vault ledger a transaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Deposit,
    Withdrawal,
}

impl LedgerKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Settlement status of a deposit or withdrawal.
///
/// Stored rows mark a settled transaction with the literal `"deposit"` on
/// both the deposits and the withdrawals tables, so that is what
/// [`LedgerStatus::Confirmed`] encodes to. `"confirmed"` is accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Confirmed,
    Pending,
    Failed,
}

impl LedgerStatus {
    pub const CONFIRMED_DB_LITERAL: &'static str = "deposit";

    pub fn from_db_str(status: &str) -> Option<Self> {
        match status {
            Self::CONFIRMED_DB_LITERAL | "confirmed" => Some(Self::Confirmed),
            "pending" => Some(Self::Pending),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// All database literals that decode to this status.
    pub const fn db_literals(&self) -> &'static [&'static str] {
        match self {
            Self::Confirmed => &[Self::CONFIRMED_DB_LITERAL, "confirmed"],
            Self::Pending => &["pending"],
            Self::Failed => &["failed"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OptionStatus {
    Active,
    Executed,
    Pending,
    Expired,
    Cancelled,
}

impl OptionStatus {
    /// Statuses whose premium has been earned by the vault.
    pub const EARNING: [Self; 2] = [Self::Active, Self::Executed];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Executed => "executed",
            Self::Pending => "pending",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_db_str(status: &str) -> Option<Self> {
        match status {
            "active" => Some(Self::Active),
            "executed" => Some(Self::Executed),
            "pending" => Some(Self::Pending),
            "expired" => Some(Self::Expired),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// An option written by the vault. `status` is `None` when the stored value
/// is not one the service knows about; such options never count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: i32,
    pub user_id: UserId,
    pub premium: Decimal,
    /// Collateral the option locks, in the vault asset.
    pub amount: Decimal,
    pub strike_price: Option<Decimal>,
    pub expiry: Option<DateTime<Utc>>,
    pub status: Option<OptionStatus>,
    pub created_at: DateTime<Utc>,
}

/// A deposit or withdrawal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i32,
    pub user_id: UserId,
    pub kind: LedgerKind,
    pub amount: Decimal,
    pub status: Option<LedgerStatus>,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}
