/// Business logic for pulls and recalls, independent of how Discord is reached
pub mod errors;
pub mod pull_service;
pub mod voice_gateway;

pub use errors::PullError;
pub use pull_service::PullService;
pub use voice_gateway::{SerenityVoice, VoiceChannel};
