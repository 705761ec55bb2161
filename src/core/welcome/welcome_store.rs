use super::welcome_models::WelcomeMessageRecord;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum WelcomeError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Channel error: {0}")]
    Channel(String),
}

/// Persistence for per-guild welcome messages, one row per guild.
/// Messages are stored without the legal notice.
#[async_trait]
pub trait WelcomeMessageStore: Send + Sync {
    /// The guild's row, if it has one.
    async fn get(&self, guild_id: u64) -> Result<Option<WelcomeMessageRecord>, WelcomeError>;

    /// Upserts the guild's message.
    async fn set(&self, guild_id: u64, message: &str) -> Result<(), WelcomeError>;

    /// Inserts the placeholder row if none exists. Returns `true` if a row was created.
    async fn ensure_created(&self, guild_id: u64) -> Result<bool, WelcomeError>;

    /// Removes the guild's row. Missing rows are not an error.
    async fn delete(&self, guild_id: u64) -> Result<(), WelcomeError>;
}
