use poise::serenity_prelude::{self as serenity, VoiceState};

use crate::{
    models::Data,
    services::{PullService, SerenityVoice},
};

/// Handle voice state updates (user joins, moves or leaves voice channels)
pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    old_state: Option<VoiceState>,
    new_state: VoiceState,
    data: &Data,
) {
    let guild_id = match new_state.guild_id {
        Some(id) => id,
        None => return,
    };

    let old_channel = old_state.as_ref().and_then(|old| old.channel_id);

    let voice = SerenityVoice::new(ctx);
    PullService::new(&data.db, &voice)
        .handle_voice_transition(guild_id, new_state.user_id, old_channel, new_state.channel_id)
        .await;
}
