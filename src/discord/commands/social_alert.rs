use crate::core::social_alert::is_valid_page_id;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

// Embed descriptions max out at 4096 characters.
const MAX_POST_PREVIEW: usize = 4000;

/// Show a Facebook page and its most recent post.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn facebook_page(
    ctx: Context<'_>,
    #[description = "Facebook page id or username"] page_id: String,
) -> Result<(), Error> {
    let Some(client) = ctx.data().social.clone() else {
        ctx.say("Facebook alerts aren't configured for this bot.")
            .await?;
        return Ok(());
    };

    if !is_valid_page_id(&page_id) {
        ctx.say("That doesn't look like a Facebook page id or username.")
            .await?;
        return Ok(());
    }

    ctx.defer().await?;

    let page = client.page_info(&page_id).await?;
    let latest = client.latest_post(&page_id).await?;

    let mut embed = serenity::CreateEmbed::new()
        .title(&page.name)
        .url(format!("https://www.facebook.com/{}", page.id))
        .color(0x1877F2)
        .footer(serenity::CreateEmbedFooter::new(format!("Page ID: {}", page.id)));

    embed = match latest {
        Some(post) => {
            let mut text = post
                .message
                .clone()
                .unwrap_or_else(|| "*This post has no text.*".to_string());
            if text.chars().count() > MAX_POST_PREVIEW {
                text = text.chars().take(MAX_POST_PREVIEW).collect();
                text.push_str("...");
            }

            let mut embed = embed
                .description(text)
                .field("Latest post", post.permalink(), false);
            if let Some(created) = post
                .created_time
                .and_then(|t| serenity::Timestamp::from_unix_timestamp(t.timestamp()).ok())
            {
                embed = embed.timestamp(created);
            }
            embed
        }
        None => embed.description("This page hasn't posted anything yet."),
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
