use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use optivault_types::{OptionRecord, OptionStatus, UserId};

use crate::schema::options;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VaultOption {
    pub id: i32,
    pub user_id: i32,
    pub asset: String,
    pub strike_price: Option<Decimal>,
    pub premium: Decimal,
    pub amount: Decimal,
    pub expiry: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl VaultOption {
    /// Options matching a status set, optionally restricted to one user and
    /// to a creation window. Newest first.
    pub fn find_filtered(
        user_id: Option<i32>,
        statuses: Vec<String>,
        created_after: Option<DateTime<Utc>>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = options::table
            .filter(options::status.eq_any(statuses))
            .select(Self::as_select())
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(options::user_id.eq(user_id));
        }
        if let Some(created_after) = created_after {
            query = query.filter(options::created_at.ge(created_after));
        }

        query.order(options::created_at.desc()).load(conn)
    }

    /// Same filter as [`VaultOption::find_filtered`] but only counts rows.
    pub fn count_filtered(
        user_id: Option<i32>,
        statuses: Vec<String>,
        created_after: Option<DateTime<Utc>>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<i64> {
        let mut query = options::table
            .filter(options::status.eq_any(statuses))
            .count()
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(options::user_id.eq(user_id));
        }
        if let Some(created_after) = created_after {
            query = query.filter(options::created_at.ge(created_after));
        }

        query.get_result(conn)
    }
}

impl From<VaultOption> for OptionRecord {
    fn from(option: VaultOption) -> Self {
        Self {
            id: option.id,
            user_id: UserId(option.user_id),
            premium: option.premium,
            amount: option.amount,
            strike_price: option.strike_price,
            expiry: option.expiry,
            status: OptionStatus::from_db_str(&option.status),
            created_at: option.created_at,
        }
    }
}
