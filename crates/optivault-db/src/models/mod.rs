pub mod ledger;
pub mod option;
pub mod user;

pub use ledger::{Deposit, Withdrawal};
pub use option::VaultOption;
pub use user::User;
