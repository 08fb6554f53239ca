pub mod users;

pub use users::{
    get_latest_user_metrics, get_user_metrics, get_user_options, get_user_transaction_history,
};
