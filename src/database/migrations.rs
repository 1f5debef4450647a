use super::Database;
use sqlx::Error as SqlxError;

impl Database {
    /// Run database migrations to create tables
    pub(super) async fn run_migrations(&self) -> Result<(), SqlxError> {
        self.create_pull_relationship_table().await?;
        Ok(())
    }

    async fn create_pull_relationship_table(&self) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pull_relationships (
                id BIGSERIAL PRIMARY KEY,
                puller_id BIGINT NOT NULL,
                pulled_id BIGINT NOT NULL,
                guild_id BIGINT NOT NULL,
                original_channel_id BIGINT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        // One puller per pulled user per guild
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS pull_relationships_pulled_idx
                ON pull_relationships (guild_id, pulled_id)
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS pull_relationships_puller_idx
                ON pull_relationships (guild_id, puller_id)
            "#,
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
