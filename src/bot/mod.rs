//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the PTA tracker, including all
//! slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (parents, students, teachers, payments, statistics)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{config::PtaConfig, errors::Error};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// School-level settings (currency, target amount, link policy)
    pub config: PtaConfig,
}

impl BotData {
    /// Creates a new `BotData` instance from a connection and loaded configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: PtaConfig) -> Self {
        Self { database, config }
    }
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::add_parent(),
        commands::parents(),
        commands::parent_info(),
        commands::edit_parent(),
        commands::delete_parent(),
        commands::add_student(),
        commands::students(),
        commands::available_students(),
        commands::edit_student(),
        commands::link_student(),
        commands::unlink_student(),
        commands::delete_student(),
        commands::add_teacher(),
        commands::teachers(),
        commands::edit_teacher(),
        commands::assign_teacher(),
        commands::unassign_teacher(),
        commands::delete_teacher(),
        commands::record_payment(),
        commands::payments(),
        commands::delete_payment(),
        commands::stats(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<(), serenity::Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!(
                    count = framework.options().commands.len(),
                    "Registered commands globally"
                );
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))
}
