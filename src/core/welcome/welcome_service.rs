use super::confirmation::{confirm_then, ConfirmationChannel, Gate};
use super::delivery::{deliver, DirectMessenger};
use super::welcome_models::{
    compose_welcome_message, fits_discord_message, normalize_new_message, strip_legal_suffix,
    WelcomeMessageRecord,
};
use super::welcome_store::{WelcomeError, WelcomeMessageStore};
use std::time::Duration;

pub const MISSING_MESSAGE_NOTICE: &str = "Please put in a welcome message to update to.";
pub const BROADCAST_CANCELLED_NOTICE: &str = "Okay, I won't send the welcome message out.";
pub const UPDATE_CANCELLED_NOTICE: &str = "Not changing welcome message then.";
pub const MESSAGE_TOO_LONG_NOTICE: &str =
    "That welcome message is too long to fit in a Discord message. Please shorten it and try again.";

/// What happened to a guild's row when the bot (re)joined it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildJoinOutcome {
    Created,
    Existing,
    /// The stored message had the legal notice baked in and was cleaned up.
    Normalized,
}

/// Welcome message business logic.
///
/// Holds the one store instance for the process; every call goes straight to it.
pub struct WelcomeService<S: WelcomeMessageStore> {
    store: S,
    confirmation_timeout: Duration,
}

impl<S: WelcomeMessageStore> WelcomeService<S> {
    pub fn new(store: S, confirmation_timeout: Duration) -> Self {
        Self {
            store,
            confirmation_timeout,
        }
    }

    /// The guild's row, creating the placeholder if the guild has none yet.
    pub async fn record(&self, guild_id: u64) -> Result<WelcomeMessageRecord, WelcomeError> {
        if let Some(record) = self.store.get(guild_id).await? {
            return Ok(record);
        }

        if self.store.ensure_created(guild_id).await? {
            tracing::debug!(guild_id, "Created placeholder welcome message");
            return Ok(WelcomeMessageRecord::placeholder(guild_id));
        }

        // Another writer inserted the row after our read.
        Ok(self
            .store
            .get(guild_id)
            .await?
            .unwrap_or_else(|| WelcomeMessageRecord::placeholder(guild_id)))
    }

    /// The full message a member receives, legal notice included.
    pub async fn welcome_message(&self, guild_id: u64) -> Result<String, WelcomeError> {
        Ok(self.record(guild_id).await?.display_message())
    }

    pub async fn handle_guild_join(&self, guild_id: u64) -> Result<GuildJoinOutcome, WelcomeError> {
        if self.store.ensure_created(guild_id).await? {
            return Ok(GuildJoinOutcome::Created);
        }

        let stored = self.store.get(guild_id).await?;
        match stored.and_then(|record| strip_legal_suffix(&record.message)) {
            Some(clean) => {
                self.store.set(guild_id, &clean).await?;
                Ok(GuildJoinOutcome::Normalized)
            }
            None => Ok(GuildJoinOutcome::Existing),
        }
    }

    pub async fn handle_guild_leave(&self, guild_id: u64) -> Result<(), WelcomeError> {
        self.store.delete(guild_id).await
    }

    /// DMs the guild's welcome message to a single new member.
    pub async fn greet_member<M: DirectMessenger + ?Sized>(
        &self,
        messenger: &M,
        guild_id: u64,
        user_id: u64,
    ) -> Result<bool, WelcomeError> {
        let message = self.welcome_message(guild_id).await?;
        Ok(deliver(messenger, &[user_id], &message).await == 1)
    }

    /// Confirmation-gated broadcast of the welcome message to `recipients`.
    pub async fn broadcast<C, M>(
        &self,
        channel: &C,
        messenger: &M,
        guild_id: u64,
        recipients: &[u64],
    ) -> Result<Gate<usize>, WelcomeError>
    where
        C: ConfirmationChannel + ?Sized,
        M: DirectMessenger + ?Sized,
    {
        let prompt = format!(
            "This will DM {} people. Are you sure you wish to do this? Y/N",
            recipients.len()
        );

        let gate = confirm_then(
            channel,
            &prompt,
            BROADCAST_CANCELLED_NOTICE,
            self.confirmation_timeout,
            move || self.deliver_welcome(messenger, guild_id, recipients),
        )
        .await?;

        if let Gate::Confirmed(delivered) = gate {
            tracing::info!(
                guild_id,
                delivered,
                recipients = recipients.len(),
                "Welcome message broadcast"
            );
            channel
                .say(&format!(
                    "Sent the welcome message to {} of {} members.",
                    delivered,
                    recipients.len()
                ))
                .await?;
        }

        Ok(gate)
    }

    /// Confirmation-gated update of the guild's custom message.
    ///
    /// A missing or blank `new_message` is rejected before any prompt is posted,
    /// as is one whose confirmation prompt would not fit in a Discord message.
    pub async fn update<C: ConfirmationChannel + ?Sized>(
        &self,
        channel: &C,
        guild_id: u64,
        new_message: Option<&str>,
    ) -> Result<Gate<String>, WelcomeError> {
        let Some(new_message) = normalize_new_message(new_message) else {
            channel.say(MISSING_MESSAGE_NOTICE).await?;
            return Ok(Gate::Skipped);
        };

        let current = self.welcome_message(guild_id).await?;
        let prompt = format!(
            "Your current welcome message is: \r\n {}\r\n\r\n Your new welcome message will be: \r\n {}\r\n\r\n Do you accept this change? Y/N",
            current,
            compose_welcome_message(&new_message)
        );
        if !fits_discord_message(&prompt) {
            channel.say(MESSAGE_TOO_LONG_NOTICE).await?;
            return Ok(Gate::Skipped);
        }

        let pending = new_message.as_str();
        let gate = confirm_then(
            channel,
            &prompt,
            UPDATE_CANCELLED_NOTICE,
            self.confirmation_timeout,
            move || self.commit_update(guild_id, pending),
        )
        .await?;

        if let Gate::Confirmed(ref updated) = gate {
            tracing::info!(guild_id, "Welcome message updated");
            channel
                .say(&format!(
                    "Your new custom part of the welcome message is {}",
                    updated
                ))
                .await?;
        }

        Ok(gate)
    }

    async fn deliver_welcome<M: DirectMessenger + ?Sized>(
        &self,
        messenger: &M,
        guild_id: u64,
        recipients: &[u64],
    ) -> Result<usize, WelcomeError> {
        let message = self.welcome_message(guild_id).await?;
        Ok(deliver(messenger, recipients, &message).await)
    }

    async fn commit_update(&self, guild_id: u64, message: &str) -> Result<String, WelcomeError> {
        self.store.set(guild_id, message).await?;
        Ok(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::welcome::confirmation::tests::ScriptedChannel;
    use crate::core::welcome::confirmation::{INVALID_INPUT_NOTICE, TIMED_OUT_NOTICE};
    use crate::core::welcome::delivery::tests::MockMessenger;
    use crate::core::welcome::welcome_models::{BASE_LEGAL_MESSAGE, DEFAULT_WELCOME_MESSAGE};
    use async_trait::async_trait;
    use dashmap::DashMap;

    /// In-memory store for testing
    #[derive(Default)]
    struct MockWelcomeStore {
        rows: DashMap<u64, String>,
        /// Rows another writer inserts just before our `ensure_created` lands.
        racing: DashMap<u64, String>,
    }

    #[async_trait]
    impl WelcomeMessageStore for MockWelcomeStore {
        async fn get(&self, guild_id: u64) -> Result<Option<WelcomeMessageRecord>, WelcomeError> {
            Ok(self
                .rows
                .get(&guild_id)
                .map(|m| WelcomeMessageRecord::new(guild_id, m.clone())))
        }

        async fn set(&self, guild_id: u64, message: &str) -> Result<(), WelcomeError> {
            self.rows.insert(guild_id, message.to_string());
            Ok(())
        }

        async fn ensure_created(&self, guild_id: u64) -> Result<bool, WelcomeError> {
            if let Some((_, message)) = self.racing.remove(&guild_id) {
                self.rows.insert(guild_id, message);
            }
            if self.rows.contains_key(&guild_id) {
                return Ok(false);
            }
            self.rows
                .insert(guild_id, DEFAULT_WELCOME_MESSAGE.to_string());
            Ok(true)
        }

        async fn delete(&self, guild_id: u64) -> Result<(), WelcomeError> {
            self.rows.remove(&guild_id);
            Ok(())
        }
    }

    const SHORT: Duration = Duration::from_millis(20);

    async fn custom_message(service: &WelcomeService<MockWelcomeStore>, guild_id: u64) -> String {
        service.record(guild_id).await.unwrap().message
    }

    fn service() -> WelcomeService<MockWelcomeStore> {
        WelcomeService::new(MockWelcomeStore::default(), SHORT)
    }

    fn service_with(guild_id: u64, message: &str) -> WelcomeService<MockWelcomeStore> {
        let store = MockWelcomeStore::default();
        store.rows.insert(guild_id, message.to_string());
        WelcomeService::new(store, SHORT)
    }

    #[tokio::test]
    async fn test_missing_guild_gets_default_and_one_row() {
        let service = service();

        let message = service.welcome_message(404).await.unwrap();

        assert!(message.contains(DEFAULT_WELCOME_MESSAGE));
        assert!(message.ends_with(BASE_LEGAL_MESSAGE));
        assert_eq!(service.store.rows.len(), 1);
        assert_eq!(
            service.store.rows.get(&404).map(|m| m.clone()),
            Some(DEFAULT_WELCOME_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_existing_guild_message_is_returned() {
        let service = service_with(1234567890, "TestGetGuildWelcomeMessage");

        let message = service.welcome_message(1234567890).await.unwrap();

        assert!(message.starts_with("TestGetGuildWelcomeMessage"));
        assert!(message.ends_with(BASE_LEGAL_MESSAGE));
        assert_eq!(service.store.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_read_returns_row_created_by_another_writer() {
        let service = service();
        service.store.racing.insert(8, "Set elsewhere".to_string());

        let record = service.record(8).await.unwrap();

        assert_eq!(record.message, "Set elsewhere");
        assert_eq!(service.store.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_read_after_leave_recreates_default() {
        let service = service_with(7, "Custom");

        service.handle_guild_leave(7).await.unwrap();
        assert!(service.store.rows.is_empty());

        let message = service.welcome_message(7).await.unwrap();
        assert!(message.starts_with(DEFAULT_WELCOME_MESSAGE));
        assert_eq!(service.store.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_guild_join_creates_then_keeps_row() {
        let service = service();

        assert_eq!(
            service.handle_guild_join(9).await.unwrap(),
            GuildJoinOutcome::Created
        );

        service.store.set(9, "Hi!").await.unwrap();
        assert_eq!(
            service.handle_guild_join(9).await.unwrap(),
            GuildJoinOutcome::Existing
        );
        assert_eq!(custom_message(&service, 9).await, "Hi!");
        assert_eq!(service.store.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_guild_join_strips_baked_in_legal_notice() {
        let service = service_with(9, &compose_welcome_message("Hi!"));

        assert_eq!(
            service.handle_guild_join(9).await.unwrap(),
            GuildJoinOutcome::Normalized
        );
        assert_eq!(custom_message(&service, 9).await, "Hi!");
    }

    #[tokio::test]
    async fn test_greet_member_ignores_closed_dms() {
        let service = service();
        let messenger = MockMessenger::with_closed(&[2]);

        assert!(service.greet_member(&messenger, 1, 1).await.unwrap());
        assert!(!service.greet_member(&messenger, 1, 2).await.unwrap());

        let sent = messenger.sent.get(&1).map(|v| v.clone()).unwrap();
        assert!(sent[0].ends_with(BASE_LEGAL_MESSAGE));
    }

    #[tokio::test]
    async fn test_confirmed_broadcast_counts_deliveries() {
        let service = service();
        let channel = ScriptedChannel::replying("Y");
        let messenger = MockMessenger::with_closed(&[22]);

        let gate = service
            .broadcast(&channel, &messenger, 5, &[11, 22, 33])
            .await
            .unwrap();

        assert_eq!(gate, Gate::Confirmed(2));
        assert_eq!(messenger.attempts(), 3);
        let said = channel.said();
        assert!(said[0].contains("This will DM 3 people"));
        assert_eq!(
            said.last().map(String::as_str),
            Some("Sent the welcome message to 2 of 3 members.")
        );
        // Lazy creation on the first read
        assert_eq!(service.store.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_broadcast_sends_nothing() {
        let service = service();
        let channel = ScriptedChannel::replying("n");
        let messenger = MockMessenger::default();

        let gate = service
            .broadcast(&channel, &messenger, 5, &[11, 22])
            .await
            .unwrap();

        assert_eq!(gate, Gate::Cancelled);
        assert_eq!(messenger.attempts(), 0);
        assert_eq!(
            channel.last_said().as_deref(),
            Some(BROADCAST_CANCELLED_NOTICE)
        );
    }

    #[tokio::test]
    async fn test_confirmed_update_persists() {
        let service = service();
        let channel = ScriptedChannel::replying("y");

        let gate = service
            .update(&channel, 3, Some("This is a totally not default message"))
            .await
            .unwrap();

        assert!(matches!(gate, Gate::Confirmed(_)));
        assert_eq!(
            custom_message(&service, 3).await,
            "This is a totally not default message"
        );
        assert!(channel
            .last_said()
            .unwrap()
            .contains("This is a totally not default message"));
    }

    #[tokio::test]
    async fn test_cancelled_update_keeps_prior_value() {
        let service = service_with(3, "Prior");
        let channel = ScriptedChannel::replying("N");

        let gate = service.update(&channel, 3, Some("Hello")).await.unwrap();

        assert_eq!(gate, Gate::Cancelled);
        assert_eq!(custom_message(&service, 3).await, "Prior");
        assert_eq!(
            channel.last_said().as_deref(),
            Some(UPDATE_CANCELLED_NOTICE)
        );
    }

    #[tokio::test]
    async fn test_invalid_or_silent_update_keeps_prior_value() {
        let service = service_with(3, "Prior");

        let channel = ScriptedChannel::replying("yes please");
        let gate = service.update(&channel, 3, Some("Hello")).await.unwrap();
        assert_eq!(gate, Gate::Invalid);
        assert_eq!(channel.last_said().as_deref(), Some(INVALID_INPUT_NOTICE));

        let channel = ScriptedChannel::silent();
        let gate = service.update(&channel, 3, Some("Hello")).await.unwrap();
        assert_eq!(gate, Gate::TimedOut);
        assert_eq!(channel.last_said().as_deref(), Some(TIMED_OUT_NOTICE));

        assert_eq!(custom_message(&service, 3).await, "Prior");
    }

    #[tokio::test]
    async fn test_update_without_message_never_prompts() {
        let service = service();
        let channel = ScriptedChannel::replying("y");

        for missing in [None, Some(""), Some("   ")] {
            let gate = service.update(&channel, 3, missing).await.unwrap();
            assert_eq!(gate, Gate::Skipped);
        }

        assert!(service.store.rows.is_empty());
        assert!(channel
            .said()
            .iter()
            .all(|s| s == MISSING_MESSAGE_NOTICE));
    }

    #[tokio::test]
    async fn test_update_too_long_for_discord_never_prompts() {
        let service = service_with(3, "Prior");
        let channel = ScriptedChannel::replying("y");
        let huge = "a".repeat(1900);

        let gate = service.update(&channel, 3, Some(huge.as_str())).await.unwrap();

        assert_eq!(gate, Gate::Skipped);
        assert_eq!(channel.said(), vec![MESSAGE_TOO_LONG_NOTICE.to_string()]);
        assert_eq!(custom_message(&service, 3).await, "Prior");
    }
}
