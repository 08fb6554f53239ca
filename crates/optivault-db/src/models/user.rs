use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use optivault_types::{UserId, WalletAddress};

use crate::schema::users;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Rows may hold the padded or the unpadded form of an address, both
    /// lowercase. Either one resolves to the same user.
    pub fn find_by_wallet(
        wallet: &WalletAddress,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        users::table
            .filter(users::wallet_address.eq_any(stored_spellings(wallet)))
            .order(users::id.asc())
            .select(Self::as_select())
            .first(conn)
    }
}

fn stored_spellings(wallet: &WalletAddress) -> Vec<String> {
    let padded = wallet.to_string();
    let unpadded = wallet.unpadded();
    if padded == unpadded {
        vec![padded]
    } else {
        vec![padded, unpadded]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_padded_and_unpadded_rows() {
        let wallet = WalletAddress::parse("0x0A11CE").unwrap();
        assert_eq!(
            stored_spellings(&wallet),
            vec![format!("0x{:0>64}", "a11ce"), "0xa11ce".to_string()]
        );

        let full = "0x050566bca02aef6f3d75364bb03ecd7249292ab65c20c4f9f15506d8578479ec";
        let wallet = WalletAddress::parse(full).unwrap();
        assert_eq!(wallet.unpadded(), full.replacen("0x0", "0x", 1));
        assert_eq!(stored_spellings(&wallet).len(), 2);
    }
}
