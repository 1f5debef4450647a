// Command modules
mod pull;

use tracing::error;

use crate::{
    models::{Data, Error},
    utils::messages::{build_usage, format_error},
};

// Re-export all commands
pub use pull::{pull, pulls, recall};

/// Framework error hook: usage hints for bad arguments, generic text otherwise
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::ArgumentParse { ctx, .. } => {
            let usage = build_usage(ctx.prefix(), &ctx.command().name);
            if let Err(e) = ctx.say(format_error(&usage)).await {
                error!("Failed to send usage hint: {}", e);
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command {} failed: {}", ctx.command().name, error);
            if let Err(e) = ctx
                .say(format_error(
                    "An error occurred while processing your command.",
                ))
                .await
            {
                error!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling framework error: {}", e);
            }
        }
    }
}
