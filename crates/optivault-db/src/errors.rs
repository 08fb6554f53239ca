use std::fmt::Display;

use diesel::result::Error as DieselError;
use thiserror::Error;

/// Failure while bringing the database up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot init database pool: {0}")]
    Pool(String),
    #[error("cannot run database migrations: {0}")]
    Migration(String),
}

/// What went wrong with a database read.
#[derive(Debug, Error)]
pub enum DbFailure {
    #[error("no connection available: {0}")]
    Pool(String),
    #[error("connection task failed: {0}")]
    Interaction(String),
    #[error("record not found")]
    NotFound,
    #[error("query failed: {0}")]
    Query(String),
}

impl From<DieselError> for DbFailure {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            other => Self::Query(other.to_string()),
        }
    }
}

/// A [`DbFailure`] tagged with the operation that hit it.
#[derive(Debug, Error)]
#[error("{failure} (operation: {operation})")]
pub struct DatabaseError {
    pub operation: String,
    pub failure: DbFailure,
}

impl DatabaseError {
    pub fn new(operation: impl Display, failure: impl Into<DbFailure>) -> Self {
        Self {
            operation: operation.to_string(),
            failure: failure.into(),
        }
    }

    pub fn query_error(operation: impl Display, message: impl Display) -> Self {
        Self::new(operation, DbFailure::Query(message.to_string()))
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self.failure, DbFailure::NotFound)
    }
}
