/// Handler modules for Discord events and interactions
mod interaction;
mod voice;

// Re-export main handler functions
pub use interaction::handle_interaction;
pub use voice::handle_voice_state_update;
