pub mod asset;
pub mod records;
pub mod wallet;

pub use asset::Asset;
pub use records::{LedgerEntry, LedgerKind, LedgerStatus, OptionRecord, OptionStatus, UserId};
pub use wallet::WalletAddress;
