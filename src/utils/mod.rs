/// Utility modules for common functionality
pub mod custom_id;
pub mod embeds;
pub mod messages;
pub mod validation;
