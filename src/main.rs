// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases, APIs)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::social_alert::{FacebookCredentials, SocialGraphClient};
use crate::core::welcome::confirmation::DEFAULT_CONFIRMATION_TIMEOUT;
use crate::core::welcome::WelcomeService;
use crate::discord::commands::presence;
use crate::discord::welcome::events as welcome_events;
use crate::discord::{Data, Error};
use crate::infra::social_alert::FacebookGraphClient;
use crate::infra::welcome::SqliteWelcomeStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_COMMAND_PREFIX: &str = "k!";
const DEFAULT_DB_PATH: &str = "data/welcome.db";

/// Event handler for non-command Discord events.
/// Guild joins/leaves keep the welcome table in sync; member joins get a DM.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if let Err(e) =
                welcome_events::handle_guild_create(data, guild, is_new.unwrap_or(false)).await
            {
                tracing::error!("Error handling guild join: {}", e);
            }
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            if let Err(e) = welcome_events::handle_guild_delete(data, incomplete).await {
                tracing::error!("Error handling guild leave: {}", e);
            }
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = welcome_events::handle_member_join(ctx, data, new_member).await {
                tracing::error!("Error sending welcome DM: {}", e);
            }
        }

        _ => {}
    }

    Ok(())
}

fn confirmation_timeout() -> Duration {
    std::env::var("WELCOME_CONFIRM_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT)
}

/// Builds the Facebook client if credentials are configured. A failed token
/// exchange only disables the feature.
async fn social_client() -> Option<Arc<dyn SocialGraphClient>> {
    let credentials = FacebookCredentials::from_env()?;

    match FacebookGraphClient::connect(&credentials).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Facebook integration disabled: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").map_err(|_| {
        anyhow::anyhow!(
            "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token."
        )
    })?;
    let prefix =
        std::env::var("COMMAND_PREFIX").unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string());
    let db_path = std::env::var("WELCOME_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let welcome_store = SqliteWelcomeStore::new(&db_path).await?;
    let welcome_service = Arc::new(WelcomeService::new(welcome_store, confirmation_timeout()));

    let social = social_client().await;
    if social.is_none() {
        tracing::info!("Facebook credentials not set, social alerts are off");
    }

    let data = Data {
        welcome: Arc::clone(&welcome_service),
        social,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required for prefix commands and Y/N replies
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::welcome::send_welcome_message(),
                discord::commands::welcome::update_welcome_message(),
                discord::commands::welcome::welcome_message(),
                discord::commands::social_alert::facebook_page(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                tracing::info!("Commands registered, bot is ready");
                presence::on_ready(ctx);

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
