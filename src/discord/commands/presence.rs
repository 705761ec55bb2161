// This module handles bot presence.
//
// Discord-layer glue only: we work with Discord SDK types (Context,
// ActivityData, OnlineStatus) and keep the logic short.

use poise::serenity_prelude as serenity;

/// Shows that the bot is greeting newcomers.
pub fn reset_status(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for new members");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Called once the bot is ready so we can announce a default presence message.
pub fn on_ready(ctx: &serenity::Context) {
    reset_status(ctx);
}
