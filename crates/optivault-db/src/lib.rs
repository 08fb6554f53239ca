pub mod errors;
pub mod models;
pub mod pool;
pub mod schema;

use deadpool_diesel::{
    Runtime,
    postgres::{Manager, Pool},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use errors::{DatabaseError, DbFailure, SetupError};
pub use pool::OptivaultPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MAX_POOL_SIZE: usize = 16;

/// Build the Postgres connection pool. Connections are opened lazily.
pub fn init_pool(app_name: &str, database_url: &str) -> Result<Pool, SetupError> {
    let manager = Manager::new(database_url, Runtime::Tokio1);
    let pool = Pool::builder(manager)
        .max_size(MAX_POOL_SIZE)
        .build()
        .map_err(|e| SetupError::Pool(e.to_string()))?;

    tracing::info!(app = app_name, max_size = MAX_POOL_SIZE, "🗃️ Database pool ready");
    Ok(pool)
}

/// Apply every pending embedded migration.
pub async fn run_migrations(pool: &Pool) -> Result<(), SetupError> {
    let conn = pool
        .get()
        .await
        .map_err(|e| SetupError::Pool(e.to_string()))?;

    let applied = conn
        .interact(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| SetupError::Migration(e.to_string()))?
        .map_err(SetupError::Migration)?;

    tracing::info!(applied, "🗃️ Database migrations done");
    Ok(())
}
