use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude::{ChannelId, GuildId, UserId};

use super::Database;
use crate::models::PullRelationship;

/// Any failure of the persistence layer
#[derive(Debug, thiserror::Error)]
#[error("storage failure: {0}")]
pub struct StorageError(#[from] sqlx::Error);

/// Guild-scoped access to active pull relationships
///
/// Implementations must keep at most one relationship per (pulled user, guild)
/// pair visible at any time, even when `upsert_exclusive` is called
/// concurrently for the same pulled user.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Exact match on puller, pulled user and guild
    async fn find(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<Option<PullRelationship>, StorageError>;

    /// Replace whatever relationship the pulled user has in this guild
    async fn upsert_exclusive(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
        original_channel: ChannelId,
    ) -> Result<(), StorageError>;

    /// Delete the exact (puller, pulled, guild) row, returning how many rows went away
    async fn remove(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<u64, StorageError>;

    /// Delete the pulled user's relationship in this guild, whoever the puller is
    async fn remove_by_pulled_user(
        &self,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<u64, StorageError>;

    /// Every relationship the puller currently holds in this guild, oldest first
    async fn list_by_puller(
        &self,
        puller: UserId,
        guild: GuildId,
    ) -> Result<Vec<PullRelationship>, StorageError>;
}

#[derive(sqlx::FromRow)]
struct PullRelationshipRow {
    puller_id: i64,
    pulled_id: i64,
    guild_id: i64,
    original_channel_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<PullRelationshipRow> for PullRelationship {
    fn from(row: PullRelationshipRow) -> Self {
        Self {
            puller_id: UserId::new(row.puller_id as u64),
            pulled_id: UserId::new(row.pulled_id as u64),
            guild_id: GuildId::new(row.guild_id as u64),
            original_channel_id: row.original_channel_id.map(|id| ChannelId::new(id as u64)),
            created_at: row.created_at,
        }
    }
}

/// Advisory lock key serializing writers for one pulled user in one guild
fn exclusivity_key(pulled: UserId, guild: GuildId) -> String {
    format!("pull_relationships:{}:{}", guild.get(), pulled.get())
}

#[async_trait]
impl RelationshipStore for Database {
    async fn find(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<Option<PullRelationship>, StorageError> {
        let row: Option<PullRelationshipRow> = sqlx::query_as(
            r#"
            SELECT puller_id, pulled_id, guild_id, original_channel_id, created_at
            FROM pull_relationships
            WHERE puller_id = $1 AND pulled_id = $2 AND guild_id = $3
            "#,
        )
        .bind(puller.get() as i64)
        .bind(pulled.get() as i64)
        .bind(guild.get() as i64)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(PullRelationship::from))
    }

    async fn upsert_exclusive(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
        original_channel: ChannelId,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await?;

        // Held until commit/rollback, so concurrent accepts for the same
        // pulled user run their delete+insert one after the other.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(exclusivity_key(pulled, guild))
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM pull_relationships WHERE pulled_id = $1 AND guild_id = $2")
            .bind(pulled.get() as i64)
            .bind(guild.get() as i64)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO pull_relationships (puller_id, pulled_id, guild_id, original_channel_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(puller.get() as i64)
        .bind(pulled.get() as i64)
        .bind(guild.get() as i64)
        .bind(original_channel.get() as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "DELETE FROM pull_relationships WHERE puller_id = $1 AND pulled_id = $2 AND guild_id = $3",
        )
        .bind(puller.get() as i64)
        .bind(pulled.get() as i64)
        .bind(guild.get() as i64)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }

    async fn remove_by_pulled_user(
        &self,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<u64, StorageError> {
        let result =
            sqlx::query("DELETE FROM pull_relationships WHERE pulled_id = $1 AND guild_id = $2")
                .bind(pulled.get() as i64)
                .bind(guild.get() as i64)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected())
    }

    async fn list_by_puller(
        &self,
        puller: UserId,
        guild: GuildId,
    ) -> Result<Vec<PullRelationship>, StorageError> {
        let rows: Vec<PullRelationshipRow> = sqlx::query_as(
            r#"
            SELECT puller_id, pulled_id, guild_id, original_channel_id, created_at
            FROM pull_relationships
            WHERE puller_id = $1 AND guild_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(puller.get() as i64)
        .bind(guild.get() as i64)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(PullRelationship::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusivity_key_is_scoped_by_guild_and_user() {
        let a = exclusivity_key(UserId::new(7), GuildId::new(1));
        let b = exclusivity_key(UserId::new(7), GuildId::new(2));
        let c = exclusivity_key(UserId::new(8), GuildId::new(1));

        assert_eq!(a, "pull_relationships:1:7");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_row_conversion_keeps_missing_channel() {
        let row = PullRelationshipRow {
            puller_id: 10,
            pulled_id: 20,
            guild_id: 30,
            original_channel_id: None,
            created_at: Utc::now(),
        };

        let relationship = PullRelationship::from(row);
        assert_eq!(relationship.puller_id, UserId::new(10));
        assert_eq!(relationship.pulled_id, UserId::new(20));
        assert_eq!(relationship.guild_id, GuildId::new(30));
        assert!(relationship.original_channel_id.is_none());
    }
}
