use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
#[error("Could not DM user {user_id}: {reason}")]
pub struct DeliveryError {
    pub user_id: u64,
    pub reason: String,
}

/// Sends a private message to a single user.
#[async_trait]
pub trait DirectMessenger: Send + Sync {
    async fn send_dm(&self, user_id: u64, content: &str) -> Result<(), DeliveryError>;
}

/// DMs every recipient in turn and returns how many deliveries succeeded.
///
/// Failures (closed DMs, blocked bot, ...) are counted as non-deliveries and
/// never abort the batch.
pub async fn deliver<M: DirectMessenger + ?Sized>(
    messenger: &M,
    recipients: &[u64],
    message: &str,
) -> usize {
    let mut delivered = 0;

    for &user_id in recipients {
        match messenger.send_dm(user_id, message).await {
            Ok(()) => delivered += 1,
            Err(e) => tracing::debug!(user_id, "Skipping recipient: {}", e),
        }
    }

    delivered
}
