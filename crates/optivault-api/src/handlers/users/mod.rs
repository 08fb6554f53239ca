pub mod metrics;
pub mod options;
pub mod transactions;

pub use metrics::{get_latest_user_metrics, get_user_metrics};
pub use options::get_user_options;
pub use transactions::get_user_transaction_history;
