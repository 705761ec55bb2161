// Discord commands for guild welcome messages.
//
// Same pattern as every command module: pull ids out of the Discord context,
// hand them to the core service with the Discord adapters, done. The
// confirmation exchange itself lives in the core.

use crate::core::social_alert::SocialGraphClient;
use crate::core::welcome::WelcomeService;
use crate::discord::welcome::adapters::{human_member_ids, CommandChannel, SerenityMessenger};
use crate::infra::welcome::SqliteWelcomeStore;
use std::sync::Arc;

/// Send the welcome message to every member of this server by DM.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn send_welcome_message(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?;

    // Paging through a big guild's members can outlast the interaction window
    ctx.defer().await?;
    let recipients = human_member_ids(ctx.http(), guild_id).await?;

    let channel = CommandChannel::new(ctx);
    let messenger = SerenityMessenger::new(ctx.serenity_context());

    ctx.data()
        .welcome
        .broadcast(&channel, &messenger, guild_id.get(), &recipients)
        .await?;
    Ok(())
}

/// Change the custom part of this server's welcome message.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn update_welcome_message(
    ctx: Context<'_>,
    #[description = "New custom part of the welcome message"]
    #[rest]
    new_message: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let channel = CommandChannel::new(ctx);

    ctx.data()
        .welcome
        .update(&channel, guild_id, new_message.as_deref())
        .await?;
    Ok(())
}

/// Show the welcome message new members of this server receive.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn welcome_message(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let message = ctx.data().welcome.welcome_message(guild_id).await?;

    ctx.say(format!("Your current welcome message is: \r\n {}", message))
        .await?;
    Ok(())
}

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub welcome: Arc<WelcomeService<SqliteWelcomeStore>>,
    /// Only present when Facebook credentials are configured.
    pub social: Option<Arc<dyn SocialGraphClient>>,
}
