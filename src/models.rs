use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashSet;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};

use crate::database::Database;

/// An accepted pull: `puller_id` may send `pulled_id` back to `original_channel_id`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRelationship {
    pub puller_id: UserId,
    pub pulled_id: UserId,
    pub guild_id: GuildId,
    pub original_channel_id: Option<ChannelId>,
    pub created_at: DateTime<Utc>,
}

/// Bot state shared across all handlers
pub struct Data {
    /// Database connection
    pub db: Database,
    /// Pull prompts whose button click is currently being processed
    in_flight_prompts: DashSet<MessageId>,
    /// How long a pull prompt stays actionable, `None` for forever
    pub prompt_timeout: Option<Duration>,
}

impl Data {
    /// Create a new Data instance with the given database connection
    pub fn new(db: Database, prompt_timeout: Option<Duration>) -> Self {
        Self {
            db,
            in_flight_prompts: DashSet::new(),
            prompt_timeout,
        }
    }

    /// Mark a prompt as being handled. Returns `None` if another click on the
    /// same prompt is still in progress.
    pub fn claim_prompt(&self, message_id: MessageId) -> Option<PromptClaim<'_>> {
        claim(&self.in_flight_prompts, message_id)
    }
}

fn claim(prompts: &DashSet<MessageId>, message_id: MessageId) -> Option<PromptClaim<'_>> {
    prompts
        .insert(message_id)
        .then(|| PromptClaim { prompts, message_id })
}

/// Releases the prompt when dropped
pub struct PromptClaim<'a> {
    prompts: &'a DashSet<MessageId>,
    message_id: MessageId,
}

impl Drop for PromptClaim<'_> {
    fn drop(&mut self) {
        self.prompts.remove(&self.message_id);
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_claim_is_exclusive_until_dropped() {
        let prompts = DashSet::new();
        let message_id = MessageId::new(42);

        let first = claim(&prompts, message_id);
        assert!(first.is_some());
        assert!(claim(&prompts, message_id).is_none());

        drop(first);
        assert!(claim(&prompts, message_id).is_some());
    }

    #[test]
    fn test_prompt_claims_are_per_message() {
        let prompts = DashSet::new();

        let _first = claim(&prompts, MessageId::new(1));
        assert!(claim(&prompts, MessageId::new(2)).is_some());
    }
}
