/// Database modules organized by feature
mod migrations;
mod relationships;
#[cfg(test)]
pub mod memory;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

pub use relationships::{RelationshipStore, StorageError};

/// Database connection pool wrapper
///
/// Owns the pull relationship table. Cloning is cheap, clones share the pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection and run migrations
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;

        info!("Database connected and migrations completed");
        Ok(db)
    }

    /// Get a reference to the connection pool (for internal use)
    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for in-flight queries and close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}
