use poise::{
    CreateReply,
    serenity_prelude::{Mentionable, User},
};
use tracing::{error, info, warn};

use crate::{
    models::{Context, Error},
    services::{PullError, PullService, SerenityVoice},
    utils::{
        embeds::{pull_prompt_buttons, pull_prompt_embed, recalled_embed},
        messages::format_pull_list,
        validation::require_guild,
    },
};

fn log_rejection(command: &str, ctx: Context<'_>, e: &PullError) {
    if e.is_user_facing() {
        info!("{} by {} rejected: {}", command, ctx.author().id, e);
    } else {
        error!("{} by {} failed: {}", command, ctx.author().id, e);
    }
}

/// Ask a user to join your voice channel
#[poise::command(prefix_command, slash_command, guild_only, aliases("cek"))]
pub async fn pull(
    ctx: Context<'_>,
    #[description = "User to pull into your voice channel"] target: User,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    let voice = SerenityVoice::new(ctx.serenity_context());
    let service = PullService::new(&ctx.data().db, &voice);

    let request = match service.request_pull(guild_id, ctx.author().id, target.id) {
        Ok(request) => request,
        Err(e) => {
            log_rejection("Pull", ctx, &e);
            ctx.say(e.user_message()).await?;
            return Ok(());
        }
    };

    ctx.send(
        CreateReply::default()
            .content(format!("{}, you have a pull request!", target.mention()))
            .embed(pull_prompt_embed(&request))
            .components(pull_prompt_buttons(request.requester, request.target)),
    )
    .await?;

    info!(
        "User {} asked to pull {} into channel {} in guild {}",
        request.requester, request.target, request.to.id, guild_id
    );

    Ok(())
}

/// Send a user you pulled back to the channel they came from
#[poise::command(prefix_command, slash_command, guild_only, aliases("at"))]
pub async fn recall(
    ctx: Context<'_>,
    #[description = "User you pulled earlier"] target: User,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    let voice = SerenityVoice::new(ctx.serenity_context());
    let service = PullService::new(&ctx.data().db, &voice);

    match service.recall(guild_id, ctx.author().id, target.id).await {
        Ok(channel) => {
            ctx.send(CreateReply::default().embed(recalled_embed(target.id, &channel)))
                .await?;
        }
        Err(e) => {
            log_rejection("Recall", ctx, &e);
            ctx.say(e.user_message()).await?;
        }
    }

    Ok(())
}

/// List the users you can currently send back
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn pulls(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    let voice = SerenityVoice::new(ctx.serenity_context());
    let service = PullService::new(&ctx.data().db, &voice);

    match service.list_pulls(guild_id, ctx.author().id).await {
        Ok(relationships) => {
            let entries: Vec<_> = relationships
                .iter()
                .map(|r| {
                    (
                        r.pulled_id,
                        r.original_channel_id,
                        r.created_at.timestamp(),
                    )
                })
                .collect();
            ctx.say(format_pull_list(&entries)).await?;
        }
        Err(e) => {
            warn!("Listing pulls for {} failed: {}", ctx.author().id, e);
            ctx.say(e.user_message()).await?;
        }
    }

    Ok(())
}
