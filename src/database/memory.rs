//! In-memory relationship store used by the service tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use poise::serenity_prelude::{ChannelId, GuildId, UserId};

use super::{RelationshipStore, StorageError};
use crate::models::PullRelationship;

/// Relationships keyed by (guild, pulled user); the key enforces exclusivity
#[derive(Default)]
pub struct MemoryStore {
    rows: DashMap<(GuildId, UserId), PullRelationship>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a storage error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of rows for a pulled user in a guild (0 or 1)
    pub fn count_for_pulled(&self, pulled: UserId, guild: GuildId) -> usize {
        self.rows
            .iter()
            .filter(|entry| entry.pulled_id == pulled && entry.guild_id == guild)
            .count()
    }

    pub fn get(&self, pulled: UserId, guild: GuildId) -> Option<PullRelationship> {
        self.rows.get(&(guild, pulled)).map(|entry| entry.clone())
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::from(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn find(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<Option<PullRelationship>, StorageError> {
        self.check()?;
        Ok(self
            .rows
            .get(&(guild, pulled))
            .filter(|entry| entry.puller_id == puller)
            .map(|entry| entry.clone()))
    }

    async fn upsert_exclusive(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
        original_channel: ChannelId,
    ) -> Result<(), StorageError> {
        self.check()?;
        self.rows.insert(
            (guild, pulled),
            PullRelationship {
                puller_id: puller,
                pulled_id: pulled,
                guild_id: guild,
                original_channel_id: Some(original_channel),
                created_at: chrono::Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove(
        &self,
        puller: UserId,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<u64, StorageError> {
        self.check()?;
        let removed = self
            .rows
            .remove_if(&(guild, pulled), |_, entry| entry.puller_id == puller);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn remove_by_pulled_user(
        &self,
        pulled: UserId,
        guild: GuildId,
    ) -> Result<u64, StorageError> {
        self.check()?;
        Ok(self.rows.remove(&(guild, pulled)).map_or(0, |_| 1))
    }

    async fn list_by_puller(
        &self,
        puller: UserId,
        guild: GuildId,
    ) -> Result<Vec<PullRelationship>, StorageError> {
        self.check()?;
        let mut rows: Vec<PullRelationship> = self
            .rows
            .iter()
            .filter(|entry| entry.puller_id == puller && entry.guild_id == guild)
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by_key(|row| row.created_at);
        Ok(rows)
    }
}
