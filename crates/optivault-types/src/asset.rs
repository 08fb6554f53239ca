use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Assets the vault can be quoted in. Prices are always expressed in USD.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    Hash,
    Eq,
    PartialEq,
    Display,
    AsRefStr,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    USD,
    USDC,
    #[default]
    BTC,
    ETH,
}

impl Asset {
    pub const fn is_usd(self) -> bool {
        matches!(self, Self::USD)
    }
}
