// Serenity-backed implementations of the welcome traits.
//
// The core only knows "send a DM to this user id" and "post a notice / wait
// for the invoker's next message". These adapters translate that into
// Discord calls and nothing else.

use crate::core::welcome::{ConfirmationChannel, DeliveryError, DirectMessenger, WelcomeError};
use crate::discord::Context;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;

// Discord caps a single member list request at 1000.
const MEMBER_PAGE_SIZE: u64 = 1000;

/// Sends DMs through the bot's HTTP client.
pub struct SerenityMessenger<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenityMessenger<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl DirectMessenger for SerenityMessenger<'_> {
    async fn send_dm(&self, user_id: u64, content: &str) -> Result<(), DeliveryError> {
        serenity::UserId::new(user_id)
            .direct_message(self.ctx, serenity::CreateMessage::new().content(content))
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError {
                user_id,
                reason: e.to_string(),
            })
    }
}

/// The channel a gated command was invoked in, scoped to its invoker.
pub struct CommandChannel<'a> {
    ctx: Context<'a>,
}

impl<'a> CommandChannel<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ConfirmationChannel for CommandChannel<'_> {
    async fn say(&self, text: &str) -> Result<(), WelcomeError> {
        self.ctx
            .say(text)
            .await
            .map(|_| ())
            .map_err(|e| WelcomeError::Channel(e.to_string()))
    }

    async fn next_reply(&self) -> Option<String> {
        serenity::MessageCollector::new(self.ctx.serenity_context())
            .author_id(self.ctx.author().id)
            .channel_id(self.ctx.channel_id())
            .await
            .map(|msg| msg.content)
    }
}

/// Ids of every non-bot member of the guild, fetched page by page over HTTP so
/// we don't depend on the member cache being complete.
pub async fn human_member_ids(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
) -> Result<Vec<u64>, serenity::Error> {
    let mut ids = Vec::new();
    let mut after = None;

    loop {
        let page = http
            .get_guild_members(guild_id, Some(MEMBER_PAGE_SIZE), after)
            .await?;
        let page_len = page.len() as u64;

        after = page.last().map(|m| m.user.id.get());
        ids.extend(
            page.into_iter()
                .filter(|m| !m.user.bot)
                .map(|m| m.user.id.get()),
        );

        if page_len < MEMBER_PAGE_SIZE {
            break;
        }
    }

    Ok(ids)
}
