use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use optivault_types::{LedgerEntry, LedgerKind, LedgerStatus, UserId};

use crate::schema::{deposits, withdrawals};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = deposits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Deposit {
    pub id: i32,
    pub user_id: i32,
    pub amount: Decimal,
    pub status: String,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = withdrawals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Withdrawal {
    pub id: i32,
    pub user_id: i32,
    pub amount: Decimal,
    pub status: String,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn status_literals(status: LedgerStatus) -> Vec<String> {
    status
        .db_literals()
        .iter()
        .map(|literal| (*literal).to_string())
        .collect()
}

impl Deposit {
    /// Amounts of every deposit with `status`, optionally for a single user.
    pub fn amounts_by_status(
        status: LedgerStatus,
        user_id: Option<i32>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Decimal>> {
        let mut query = deposits::table
            .filter(deposits::status.eq_any(status_literals(status)))
            .select(deposits::amount)
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(deposits::user_id.eq(user_id));
        }

        query.load(conn)
    }

    pub fn find_by_user(
        user_id: i32,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        deposits::table
            .filter(deposits::user_id.eq(user_id))
            .order(deposits::created_at.desc())
            .limit(limit)
            .select(Self::as_select())
            .load(conn)
    }
}

impl Withdrawal {
    /// Amounts of every withdrawal with `status`, optionally for a single user.
    pub fn amounts_by_status(
        status: LedgerStatus,
        user_id: Option<i32>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Decimal>> {
        let mut query = withdrawals::table
            .filter(withdrawals::status.eq_any(status_literals(status)))
            .select(withdrawals::amount)
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(withdrawals::user_id.eq(user_id));
        }

        query.load(conn)
    }

    pub fn find_by_user(
        user_id: i32,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        withdrawals::table
            .filter(withdrawals::user_id.eq(user_id))
            .order(withdrawals::created_at.desc())
            .limit(limit)
            .select(Self::as_select())
            .load(conn)
    }
}

impl From<Deposit> for LedgerEntry {
    fn from(row: Deposit) -> Self {
        Self {
            id: row.id,
            user_id: UserId(row.user_id),
            kind: LedgerKind::Deposit,
            amount: row.amount,
            status: LedgerStatus::from_db_str(&row.status),
            tx_hash: row.tx_hash,
            created_at: row.created_at,
        }
    }
}

impl From<Withdrawal> for LedgerEntry {
    fn from(row: Withdrawal) -> Self {
        Self {
            id: row.id,
            user_id: UserId(row.user_id),
            kind: LedgerKind::Withdrawal,
            amount: row.amount,
            status: LedgerStatus::from_db_str(&row.status),
            tx_hash: row.tx_hash,
            created_at: row.created_at,
        }
    }
}
