//! Pure functions for formatting user-facing messages (Discord-agnostic)
use poise::serenity_prelude::{ChannelId, UserId};

/// Format a validation error message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format an info message with emoji
pub fn format_info(message: &str) -> String {
    format!("ℹ️ {}", message)
}

/// Build a database error message (generic, doesn't expose internals)
pub fn build_database_error() -> String {
    format_error("A database error occurred. Please try again later.")
}

/// Build the generic message for a voice move Discord refused
pub fn build_move_error() -> String {
    format_error("Failed to move the user. Please check bot permissions.")
}

/// Build a usage hint for a command taking a user mention
pub fn build_usage(prefix: &str, command: &str) -> String {
    format!("Usage: `{}{} @user`", prefix, command)
}

/// Render the relationships a user may recall, one per line.
/// Each entry is (pulled user, original channel, unix time of the pull).
pub fn format_pull_list(entries: &[(UserId, Option<ChannelId>, i64)]) -> String {
    if entries.is_empty() {
        return format_info("You haven't pulled anyone in this server.");
    }

    let lines = entries
        .iter()
        .map(|(pulled, channel, pulled_at)| match channel {
            Some(channel) => format!(
                "• <@{}> → back to <#{}> (pulled <t:{}:R>)",
                pulled, channel, pulled_at
            ),
            None => format!(
                "• <@{}> → original channel unknown (pulled <t:{}:R>)",
                pulled, pulled_at
            ),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("**Users you can recall:**\n{}", lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        assert_eq!(format_error("Something failed"), "❌ Something failed");
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info("Good to know"), "ℹ️ Good to know");
    }

    #[test]
    fn test_build_database_error() {
        let result = build_database_error();
        assert!(result.contains("❌"));
        assert!(result.contains("database"));
    }

    #[test]
    fn test_build_move_error() {
        let result = build_move_error();
        assert!(result.starts_with("❌"));
        assert!(result.contains("permissions"));
    }

    #[test]
    fn test_build_usage() {
        assert_eq!(build_usage(".", "pull"), "Usage: `.pull @user`");
        assert_eq!(build_usage("!", "recall"), "Usage: `!recall @user`");
    }

    #[test]
    fn test_format_pull_list_empty() {
        let result = format_pull_list(&[]);
        assert!(result.starts_with("ℹ️"));
        assert!(result.contains("haven't pulled anyone"));
    }

    #[test]
    fn test_format_pull_list_entries() {
        let result = format_pull_list(&[
            (UserId::new(1), Some(ChannelId::new(10)), 1_700_000_000),
            (UserId::new(2), None, 1_700_000_100),
        ]);

        assert!(result.contains("• <@1> → back to <#10> (pulled <t:1700000000:R>)"));
        assert!(result.contains("• <@2> → original channel unknown (pulled <t:1700000100:R>)"));
        assert_eq!(result.lines().count(), 3);
    }
}
