use std::fmt;

use serde::{Deserialize, Serialize};
use starknet::core::types::Felt;

/// Number of hex digits of a fully padded Starknet address.
const ADDRESS_HEX_LEN: usize = 64;

/// A Starknet wallet address in canonical form: `0x` followed by 64 lowercase
/// hex digits.
///
/// Wallets hand out addresses with or without padding and in mixed case, so
/// everything stored or looked up goes through [`WalletAddress::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and normalize an address. Returns `None` when the input is not a
    /// valid field element.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits)
            .to_ascii_lowercase();

        if digits.is_empty() || digits.len() > ADDRESS_HEX_LEN {
            return None;
        }

        // Range and charset check, the felt itself is not kept.
        Felt::from_hex(&format!("0x{digits}")).ok()?;

        let significant = digits.trim_start_matches('0');
        Some(Self(format!("0x{significant:0>ADDRESS_HEX_LEN$}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address without leading zeros, as most wallets display it.
    pub fn unpadded(&self) -> String {
        let significant = self.0[2..].trim_start_matches('0');
        if significant.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{significant}")
        }
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid wallet address: {value}"))
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}
