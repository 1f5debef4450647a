use ::serenity::{Error as SerenityError, http::HttpError};
use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, ChannelId, GuildId, UserId};

use crate::constants::DISCORD_NOT_IN_VOICE_CODE;

/// A guild channel as seen by the pull flows
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceChannel {
    pub id: ChannelId,
    pub name: String,
}

/// Why Discord did not move a member
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("the member is not connected to voice")]
    NotInVoice,
    #[error("discord refused the move: {0}")]
    Refused(String),
}

impl From<SerenityError> for MoveError {
    fn from(error: SerenityError) -> Self {
        if let SerenityError::Http(HttpError::UnsuccessfulRequest(response)) = &error
            && response.error.code == DISCORD_NOT_IN_VOICE_CODE
        {
            return MoveError::NotInVoice;
        }
        MoveError::Refused(error.to_string())
    }
}

/// Live voice state and the voice-move capability of the host platform
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Voice channel the user is connected to, if any
    fn voice_channel(&self, guild_id: GuildId, user_id: UserId) -> Option<VoiceChannel>;

    /// Look up a channel that may have been deleted since it was recorded
    fn resolve_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<VoiceChannel>;

    /// Whether the user is still a member of the guild
    fn is_member(&self, guild_id: GuildId, user_id: UserId) -> bool;

    /// Move a connected member to another voice channel
    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), MoveError>;
}

/// Reads voice state from the serenity cache and moves members over HTTP
pub struct SerenityVoice<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenityVoice<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl VoiceGateway for SerenityVoice<'_> {
    fn voice_channel(&self, guild_id: GuildId, user_id: UserId) -> Option<VoiceChannel> {
        let guild = self.ctx.cache.guild(guild_id)?;
        let channel_id = guild.voice_states.get(&user_id)?.channel_id?;

        let name = guild
            .channels
            .get(&channel_id)
            .map(|channel| channel.name.clone())
            .unwrap_or_else(|| channel_id.to_string());

        Some(VoiceChannel {
            id: channel_id,
            name,
        })
    }

    fn resolve_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Option<VoiceChannel> {
        let guild = self.ctx.cache.guild(guild_id)?;
        guild.channels.get(&channel_id).map(|channel| VoiceChannel {
            id: channel.id,
            name: channel.name.clone(),
        })
    }

    fn is_member(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.ctx.cache.guild(guild_id).is_some_and(|guild| {
            guild.members.contains_key(&user_id) || guild.voice_states.contains_key(&user_id)
        })
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), MoveError> {
        guild_id
            .move_member(self.ctx, user_id, channel_id)
            .await
            .map(|_| ())
            .map_err(MoveError::from)
    }
}
