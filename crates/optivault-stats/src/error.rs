use optivault_db::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
    #[error("Price feed error: {0}")]
    Price(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
