/// Default prefix for text commands
pub const DEFAULT_COMMAND_PREFIX: &str = ".";

/// Custom id tag of the accept button on a pull prompt
pub const ACCEPT_PULL_ID: &str = "accept-pull";

/// Custom id tag of the decline button on a pull prompt
pub const DECLINE_PULL_ID: &str = "decline-pull";

/// Separator between the fields of a pull button custom id
pub const CUSTOM_ID_SEPARATOR: char = ':';

/// Embed colours
pub const PROMPT_COLOUR: u32 = 0x0099ff;
pub const ACCEPTED_COLOUR: u32 = 0x00ff00;
pub const DECLINED_COLOUR: u32 = 0xff0000;
pub const RECALLED_COLOUR: u32 = 0xff9900;
pub const EXPIRED_COLOUR: u32 = 0x808080;

/// Discord JSON error code for "Target user is not connected to voice"
pub const DISCORD_NOT_IN_VOICE_CODE: isize = 40032;

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "voicepull_rs=info";
