// Confirmation-gated actions.
//
// A gated command posts a prompt, waits a bounded time for the invoker's next
// message, and only runs its action on an explicit "y". Every other outcome is
// terminal: the user has to reissue the command to try again.

use super::welcome_store::WelcomeError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// How long we wait for a Y/N reply unless configured otherwise.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(5);

pub const TIMED_OUT_NOTICE: &str = "Timed out";
pub const INVALID_INPUT_NOTICE: &str = "Invalid input. Please restart with the command.";

/// Where the prompt and notices go, and where replies come from.
#[async_trait]
pub trait ConfirmationChannel: Send + Sync {
    /// Posts a message in the invoking channel.
    async fn say(&self, text: &str) -> Result<(), WelcomeError>;

    /// Resolves with the invoker's next message in the invoking channel.
    ///
    /// May wait forever; callers bound it with [`await_reply`].
    async fn next_reply(&self) -> Option<String>;
}

/// Reply to a Y/N prompt after trimming and case-folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
    Invalid,
}

pub fn parse_reply(content: &str) -> Reply {
    match content.trim().to_lowercase().as_str() {
        "y" => Reply::Yes,
        "n" => Reply::No,
        _ => Reply::Invalid,
    }
}

/// Terminal state of a gated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate<T> {
    /// Rejected before a prompt was ever posted (e.g. missing argument).
    Skipped,
    TimedOut,
    Invalid,
    Cancelled,
    Confirmed(T),
}

/// Waits for the next reply, giving up after `timeout`.
pub async fn await_reply<C: ConfirmationChannel + ?Sized>(
    channel: &C,
    timeout: Duration,
) -> Option<String> {
    tokio::time::timeout(timeout, channel.next_reply())
        .await
        .ok()
        .flatten()
}

/// Posts `prompt`, waits for a Y/N answer and runs `action` only on "y".
///
/// The timeout, invalid-input and cancellation notices are posted here; the
/// success notice is left to the caller since it depends on the action's result.
pub async fn confirm_then<C, T, F, Fut>(
    channel: &C,
    prompt: &str,
    cancel_notice: &str,
    timeout: Duration,
    action: F,
) -> Result<Gate<T>, WelcomeError>
where
    C: ConfirmationChannel + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, WelcomeError>>,
{
    channel.say(prompt).await?;

    let Some(content) = await_reply(channel, timeout).await else {
        channel.say(TIMED_OUT_NOTICE).await?;
        return Ok(Gate::TimedOut);
    };

    match parse_reply(&content) {
        Reply::Invalid => {
            channel.say(INVALID_INPUT_NOTICE).await?;
            Ok(Gate::Invalid)
        }
        Reply::No => {
            channel.say(cancel_notice).await?;
            Ok(Gate::Cancelled)
        }
        Reply::Yes => Ok(Gate::Confirmed(action().await?)),
    }
}
