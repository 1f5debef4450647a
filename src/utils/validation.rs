use std::time::Duration;

use poise::serenity_prelude::{GuildId, UserId};

use super::custom_id::PullAction;

/// A precondition of a pull, recall or prompt click that does not hold
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("This command must be used in a server")]
    NotInGuild,
    #[error("You cannot pull yourself!")]
    SelfTarget,
    #[error("You must be in a voice channel to pull someone!")]
    RequesterNotInVoice,
    #[error("<@{0}> is not in a voice channel!")]
    TargetNotInVoice(UserId),
    #[error("<@{0}> is already in your voice channel!")]
    AlreadyInChannel(UserId),
    #[error("Only the mentioned user can {} this request!", .0.verb())]
    WrongInvoker(PullAction),
    #[error("One of the users is no longer in the server!")]
    MemberLeftGuild,
    #[error("The person who requested the pull is no longer in a voice channel!")]
    RequesterLeftVoice,
    #[error("You are no longer in a voice channel!")]
    TargetLeftVoice,
    #[error("Original channel no longer exists!")]
    OriginalChannelGone,
    #[error("This pull request is invalid.")]
    MalformedPrompt,
    #[error("This pull request is already being handled.")]
    PromptBusy,
}

/// Extract guild ID from context, returning error if not in a guild
pub fn require_guild(guild_id: Option<GuildId>) -> Result<GuildId, ValidationError> {
    guild_id.ok_or(ValidationError::NotInGuild)
}

/// Whether a prompt created at `created_at` (unix seconds) is past its timeout
pub fn is_prompt_expired(created_at: i64, now: i64, timeout: Option<Duration>) -> bool {
    match timeout {
        Some(timeout) => now.saturating_sub(created_at) > timeout.as_secs() as i64,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_guild() {
        assert!(require_guild(None).is_err());
        assert!(require_guild(Some(GuildId::new(123))).is_ok());
    }

    #[test]
    fn test_messages_mention_the_user() {
        assert_eq!(
            ValidationError::TargetNotInVoice(UserId::new(99)).to_string(),
            "<@99> is not in a voice channel!"
        );
        assert_eq!(
            ValidationError::AlreadyInChannel(UserId::new(99)).to_string(),
            "<@99> is already in your voice channel!"
        );
    }

    #[test]
    fn test_wrong_invoker_names_the_action() {
        assert_eq!(
            ValidationError::WrongInvoker(PullAction::Accept).to_string(),
            "Only the mentioned user can accept this request!"
        );
        assert_eq!(
            ValidationError::WrongInvoker(PullAction::Decline).to_string(),
            "Only the mentioned user can decline this request!"
        );
    }

    #[test]
    fn test_prompt_without_timeout_never_expires() {
        assert!(!is_prompt_expired(0, i64::MAX, None));
    }

    #[test]
    fn test_prompt_expiry_boundary() {
        let timeout = Some(Duration::from_secs(60));
        assert!(!is_prompt_expired(1_000, 1_000, timeout));
        assert!(!is_prompt_expired(1_000, 1_060, timeout));
        assert!(is_prompt_expired(1_000, 1_061, timeout));
    }

    #[test]
    fn test_prompt_from_the_future_is_not_expired() {
        assert!(!is_prompt_expired(2_000, 1_000, Some(Duration::from_secs(1))));
    }
}
