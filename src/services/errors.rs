use crate::{
    database::StorageError,
    services::voice_gateway::MoveError,
    utils::{
        messages::{build_database_error, build_move_error, format_error},
        validation::ValidationError,
    },
};

/// Everything that can stop a pull, recall or prompt click
#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no pull relationship between these users")]
    NotFound,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PullError {
    /// Text shown to the user who triggered the failing action
    pub fn user_message(&self) -> String {
        match self {
            PullError::Validation(e) => format_error(&e.to_string()),
            PullError::NotFound => format_error("You can only recall users that you have pulled!"),
            PullError::Move(MoveError::NotInVoice) => {
                format_error("The user is no longer in a voice channel!")
            }
            PullError::Move(MoveError::Refused(_)) => build_move_error(),
            PullError::Storage(_) => build_database_error(),
        }
    }

    /// Whether the failure is the user's to fix rather than the bot's
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            PullError::Validation(_) | PullError::NotFound | PullError::Move(MoveError::NotInVoice)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_specific() {
        let error = PullError::from(ValidationError::SelfTarget);
        assert_eq!(error.user_message(), "❌ You cannot pull yourself!");
        assert!(error.is_user_facing());
    }

    #[test]
    fn test_not_found_message() {
        let message = PullError::NotFound.user_message();
        assert!(message.contains("only recall users that you have pulled"));
    }

    #[test]
    fn test_refused_move_is_generic() {
        let error = PullError::from(MoveError::Refused("Missing Permissions".to_string()));
        assert_eq!(error.user_message(), build_move_error());
        assert!(!error.user_message().contains("Missing Permissions"));
        assert!(!error.is_user_facing());
    }

    #[test]
    fn test_storage_failure_hides_internals() {
        let error = PullError::from(StorageError::from(sqlx::Error::PoolClosed));
        assert_eq!(error.user_message(), build_database_error());
        assert!(!error.is_user_facing());
    }
}
