//! Pull service - the pull, accept, decline, recall and departure flows
use poise::serenity_prelude::{ChannelId, GuildId, UserId};
use tracing::{error, info, warn};

use crate::{
    database::RelationshipStore,
    models::PullRelationship,
    services::{
        errors::PullError,
        voice_gateway::{VoiceChannel, VoiceGateway},
    },
    utils::{
        custom_id::PullPayload,
        validation::ValidationError,
    },
};

/// A validated pull request, ready to be rendered as a prompt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRequest {
    pub requester: UserId,
    pub target: UserId,
    /// Channel the target is currently in
    pub from: VoiceChannel,
    /// Channel the requester is currently in
    pub to: VoiceChannel,
}

/// Result of an accepted pull whose move went through
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedPull {
    pub pulled: UserId,
    pub from: VoiceChannel,
    pub to: VoiceChannel,
}

/// Whether a voice state transition is a full disconnect (channel -> none)
pub fn is_voice_departure(old: Option<ChannelId>, new: Option<ChannelId>) -> bool {
    old.is_some() && new.is_none()
}

/// Service for pull-related operations
pub struct PullService<'a> {
    store: &'a dyn RelationshipStore,
    voice: &'a dyn VoiceGateway,
}

impl<'a> PullService<'a> {
    /// Create a new pull service
    pub fn new(store: &'a dyn RelationshipStore, voice: &'a dyn VoiceGateway) -> Self {
        Self { store, voice }
    }

    /// Validate a pull command. Nothing is persisted until the target accepts.
    pub fn request_pull(
        &self,
        guild_id: GuildId,
        requester: UserId,
        target: UserId,
    ) -> Result<PullRequest, PullError> {
        if requester == target {
            return Err(ValidationError::SelfTarget.into());
        }

        let to = self
            .voice
            .voice_channel(guild_id, requester)
            .ok_or(ValidationError::RequesterNotInVoice)?;

        let from = self
            .voice
            .voice_channel(guild_id, target)
            .ok_or(ValidationError::TargetNotInVoice(target))?;

        if from.id == to.id {
            return Err(ValidationError::AlreadyInChannel(target).into());
        }

        Ok(PullRequest {
            requester,
            target,
            from,
            to,
        })
    }

    /// Only the user a prompt is addressed to may press its buttons
    pub fn authorize(&self, invoker: UserId, payload: &PullPayload) -> Result<(), PullError> {
        if invoker != payload.target {
            return Err(ValidationError::WrongInvoker(payload.action).into());
        }
        Ok(())
    }

    /// Handle the accept button of a prompt.
    ///
    /// The payload comes from the client, so both users are checked again
    /// against live membership and voice state. The relationship is written
    /// before the move; a failed move leaves it in place.
    pub async fn accept(
        &self,
        guild_id: GuildId,
        invoker: UserId,
        payload: &PullPayload,
    ) -> Result<AcceptedPull, PullError> {
        self.authorize(invoker, payload)?;

        let (requester, target) = (payload.requester, payload.target);

        if !self.voice.is_member(guild_id, requester) || !self.voice.is_member(guild_id, target) {
            return Err(ValidationError::MemberLeftGuild.into());
        }

        let to = self
            .voice
            .voice_channel(guild_id, requester)
            .ok_or(ValidationError::RequesterLeftVoice)?;

        let from = self
            .voice
            .voice_channel(guild_id, target)
            .ok_or(ValidationError::TargetLeftVoice)?;

        if from.id == to.id {
            return Err(ValidationError::AlreadyInChannel(target).into());
        }

        self.store
            .upsert_exclusive(requester, target, guild_id, from.id)
            .await?;

        self.voice.move_member(guild_id, target, to.id).await?;

        info!(
            "User {} accepted pull from {} in guild {} ({} -> {})",
            target, requester, guild_id, from.id, to.id
        );

        Ok(AcceptedPull {
            pulled: target,
            from,
            to,
        })
    }

    /// Handle the decline button of a prompt. Nothing is stored.
    pub fn decline(&self, invoker: UserId, payload: &PullPayload) -> Result<(), PullError> {
        self.authorize(invoker, payload)?;

        info!(
            "User {} declined pull from {}",
            payload.target, payload.requester
        );
        Ok(())
    }

    /// Send a pulled user back to the channel they were pulled from.
    ///
    /// The relationship is deleted only once the move succeeded, so a refused
    /// move can be retried.
    pub async fn recall(
        &self,
        guild_id: GuildId,
        invoker: UserId,
        target: UserId,
    ) -> Result<VoiceChannel, PullError> {
        let relationship = self
            .store
            .find(invoker, target, guild_id)
            .await?
            .ok_or(PullError::NotFound)?;

        if self.voice.voice_channel(guild_id, target).is_none() {
            return Err(ValidationError::TargetNotInVoice(target).into());
        }

        let original = relationship
            .original_channel_id
            .and_then(|channel_id| self.voice.resolve_channel(guild_id, channel_id))
            .ok_or(ValidationError::OriginalChannelGone)?;

        self.voice
            .move_member(guild_id, target, original.id)
            .await?;

        // The member has already moved; a leftover row is logged rather than
        // reported as a failed recall.
        match self.store.remove(invoker, target, guild_id).await {
            Ok(0) => warn!(
                "Pull relationship {} -> {} in guild {} was gone before recall finished",
                invoker, target, guild_id
            ),
            Ok(_) => {}
            Err(e) => error!(
                "Failed to delete pull relationship {} -> {} in guild {}: {}",
                invoker, target, guild_id, e
            ),
        }

        info!(
            "User {} recalled {} to channel {} in guild {}",
            invoker, target, original.id, guild_id
        );

        Ok(original)
    }

    /// Relationships the user may currently recall in this guild
    pub async fn list_pulls(
        &self,
        guild_id: GuildId,
        puller: UserId,
    ) -> Result<Vec<PullRelationship>, PullError> {
        Ok(self.store.list_by_puller(puller, guild_id).await?)
    }

    /// Drop the relationship of a user who disconnected from voice.
    ///
    /// Runs off a gateway event with nobody to answer, so unlike every other
    /// flow a storage failure here is logged and swallowed. Channel to channel
    /// moves, including the move done by an accepted pull, keep the relationship.
    pub async fn handle_voice_transition(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        old: Option<ChannelId>,
        new: Option<ChannelId>,
    ) {
        if !is_voice_departure(old, new) {
            return;
        }

        match self.store.remove_by_pulled_user(user_id, guild_id).await {
            Ok(0) => {}
            Ok(removed) => info!(
                "Cleared {} pull relationship(s) for user {} who left voice in guild {}",
                removed, user_id, guild_id
            ),
            Err(e) => error!(
                "Error cleaning up pull relationships for user {} in guild {}: {}",
                user_id, guild_id, e
            ),
        }
    }
}
