//! Embeds and buttons of the pull prompt and its outcomes
use poise::serenity_prelude::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, Timestamp, UserId,
};

use crate::{
    constants::{ACCEPTED_COLOUR, DECLINED_COLOUR, EXPIRED_COLOUR, PROMPT_COLOUR, RECALLED_COLOUR},
    services::{
        VoiceChannel,
        pull_service::{AcceptedPull, PullRequest},
    },
    utils::custom_id::PullPayload,
};

/// Prompt shown to the target of a pull command
pub fn pull_prompt_embed(request: &PullRequest) -> CreateEmbed {
    CreateEmbed::new()
        .colour(PROMPT_COLOUR)
        .title("Voice Channel Pull Request")
        .description(format!(
            "<@{}> wants to pull you to **{}**",
            request.requester, request.to.name
        ))
        .field("From", &request.from.name, true)
        .field("To", &request.to.name, true)
        .timestamp(Timestamp::now())
}

/// Accept and decline buttons, each carrying both identities
pub fn pull_prompt_buttons(requester: UserId, target: UserId) -> Vec<CreateActionRow> {
    let [accept, decline] = PullPayload::buttons(requester, target);

    vec![CreateActionRow::Buttons(vec![
        CreateButton::new(accept.to_string())
            .label("Accept")
            .style(ButtonStyle::Success),
        CreateButton::new(decline.to_string())
            .label("Decline")
            .style(ButtonStyle::Danger),
    ])]
}

pub fn accepted_embed(accepted: &AcceptedPull) -> CreateEmbed {
    CreateEmbed::new()
        .colour(ACCEPTED_COLOUR)
        .title("Pull Request Accepted")
        .description(format!(
            "<@{}> has been moved from **{}** to **{}**",
            accepted.pulled, accepted.from.name, accepted.to.name
        ))
        .timestamp(Timestamp::now())
}

pub fn declined_embed() -> CreateEmbed {
    CreateEmbed::new()
        .colour(DECLINED_COLOUR)
        .title("Pull Request Declined")
        .description("The pull request has been declined.")
        .timestamp(Timestamp::now())
}

pub fn expired_embed() -> CreateEmbed {
    CreateEmbed::new()
        .colour(EXPIRED_COLOUR)
        .title("Pull Request Expired")
        .description("This pull request is no longer valid. Ask for a new one.")
        .timestamp(Timestamp::now())
}

/// Result of a successful recall, posted publicly
pub fn recalled_embed(target: UserId, channel: &VoiceChannel) -> CreateEmbed {
    CreateEmbed::new()
        .colour(RECALLED_COLOUR)
        .title("User Sent Back")
        .description(format!(
            "<@{}> has been moved back to **{}**",
            target, channel.name
        ))
        .timestamp(Timestamp::now())
}
