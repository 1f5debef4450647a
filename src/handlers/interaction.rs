use ::serenity::Error as SerenityError;
use poise::serenity_prelude::{
    self as serenity, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use tracing::{error, info, warn};

use crate::{
    models::{Data, Error},
    services::{PullError, PullService, SerenityVoice},
    utils::{
        custom_id::{PayloadError, PullAction, PullPayload},
        embeds::{accepted_embed, declined_embed, expired_embed},
        validation::{ValidationError, is_prompt_expired},
    },
};

/// Handle component interactions (button clicks)
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: serenity::ComponentInteraction,
    data: &Data,
) {
    let payload = match interaction.data.custom_id.parse::<PullPayload>() {
        Ok(payload) => payload,
        Err(PayloadError::UnknownAction) => return,
        Err(PayloadError::Malformed) => {
            warn!(
                "Rejected malformed pull button '{}' from user {}",
                interaction.data.custom_id, interaction.user.id
            );
            let message = PullError::from(ValidationError::MalformedPrompt).user_message();
            if let Err(e) = respond_ephemeral(ctx, &interaction, message).await {
                error!("Failed to reject malformed pull button: {}", e);
            }
            return;
        }
    };

    if let Err(e) = handle_pull_button(ctx, &interaction, &payload, data).await {
        error!("Failed to handle pull button: {}", e);
    }
}

/// Handle the accept or decline button of a pull prompt
async fn handle_pull_button(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    payload: &PullPayload,
    data: &Data,
) -> Result<(), Error> {
    let Some(guild_id) = interaction.guild_id else {
        let message = PullError::from(ValidationError::NotInGuild).user_message();
        respond_ephemeral(ctx, interaction, message).await?;
        return Ok(());
    };

    let voice = SerenityVoice::new(ctx);
    let service = PullService::new(&data.db, &voice);
    let invoker = interaction.user.id;

    if let Err(e) = service.authorize(invoker, payload) {
        warn!(
            "User {} pressed a pull button addressed to {}",
            invoker, payload.target
        );
        respond_ephemeral(ctx, interaction, e.user_message()).await?;
        return Ok(());
    }

    // Held until this click is answered; a second click meanwhile is refused
    let Some(_claim) = data.claim_prompt(interaction.message.id) else {
        let message = PullError::from(ValidationError::PromptBusy).user_message();
        respond_ephemeral(ctx, interaction, message).await?;
        return Ok(());
    };

    let created_at = interaction.message.timestamp.unix_timestamp();
    if is_prompt_expired(created_at, chrono::Utc::now().timestamp(), data.prompt_timeout) {
        info!(
            "Pull prompt {} from {} expired before {} answered",
            interaction.message.id, payload.requester, invoker
        );
        resolve_prompt(ctx, interaction, expired_embed()).await?;
        return Ok(());
    }

    match payload.action {
        PullAction::Decline => {
            service.decline(invoker, payload)?;
            resolve_prompt(ctx, interaction, declined_embed()).await?;
        }
        PullAction::Accept => {
            // Storage and the move can outlive Discord's response window
            interaction
                .create_response(ctx, CreateInteractionResponse::Acknowledge)
                .await?;

            match service.accept(guild_id, invoker, payload).await {
                Ok(accepted) => {
                    interaction
                        .edit_response(
                            ctx,
                            EditInteractionResponse::new()
                                .embed(accepted_embed(&accepted))
                                .components(vec![]),
                        )
                        .await?;
                }
                Err(e) => {
                    if e.is_user_facing() {
                        warn!("Pull accept by {} rejected: {}", invoker, e);
                    } else {
                        error!("Pull accept by {} failed: {}", invoker, e);
                    }
                    interaction
                        .create_followup(
                            ctx,
                            CreateInteractionResponseFollowup::new()
                                .content(e.user_message())
                                .ephemeral(true),
                        )
                        .await?;
                }
            }
        }
    }

    Ok(())
}

/// Answer only the user who clicked
async fn respond_ephemeral(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: String,
) -> Result<(), SerenityError> {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    interaction.create_response(ctx, response).await
}

/// Replace the prompt with its outcome and drop the buttons so it cannot be reused
async fn resolve_prompt(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    embed: CreateEmbed,
) -> Result<(), SerenityError> {
    let response = CreateInteractionResponse::UpdateMessage(
        CreateInteractionResponseMessage::new()
            .embed(embed)
            .components(vec![]),
    );
    interaction.create_response(ctx, response).await
}
