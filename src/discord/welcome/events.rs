use crate::core::welcome::GuildJoinOutcome;
use crate::discord::welcome::adapters::SerenityMessenger;
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude as serenity;

/// Makes sure the guild has a welcome message row. Fires for every guild on
/// startup as well as for genuinely new ones.
pub async fn handle_guild_create(data: &Data, guild: &serenity::Guild, is_new: bool) -> Result<()> {
    let guild_id = guild.id.get();

    match data.welcome.handle_guild_join(guild_id).await? {
        GuildJoinOutcome::Created => {
            tracing::info!(guild_id, is_new, "Created welcome message for guild")
        }
        GuildJoinOutcome::Normalized => {
            tracing::info!(guild_id, "Stripped legal notice from stored welcome message")
        }
        GuildJoinOutcome::Existing => {}
    }

    Ok(())
}

/// An outage also produces GuildDelete; only a real removal counts as leaving.
fn left_guild(incomplete: &serenity::UnavailableGuild) -> bool {
    !incomplete.unavailable
}

fn should_greet(user: &serenity::User) -> bool {
    !user.bot
}

pub async fn handle_guild_delete(data: &Data, incomplete: &serenity::UnavailableGuild) -> Result<()> {
    if !left_guild(incomplete) {
        tracing::debug!(guild_id = incomplete.id.get(), "Guild unavailable, keeping welcome message");
        return Ok(());
    }

    let guild_id = incomplete.id.get();
    data.welcome.handle_guild_leave(guild_id).await?;
    tracing::info!(guild_id, "Left guild, removed its welcome message");
    Ok(())
}

pub async fn handle_member_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) -> Result<()> {
    if !should_greet(&member.user) {
        return Ok(());
    }

    let messenger = SerenityMessenger::new(ctx);
    let delivered = data
        .welcome
        .greet_member(&messenger, member.guild_id.get(), member.user.id.get())
        .await?;

    tracing::debug!(
        guild_id = member.guild_id.get(),
        user_id = member.user.id.get(),
        delivered,
        "Welcome DM attempted"
    );
    Ok(())
}
