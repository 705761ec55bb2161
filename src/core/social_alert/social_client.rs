use super::social_models::{FacebookPage, FeedPost};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SocialAlertError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Graph API error ({code}): {message}")]
    Api { code: i64, message: String },
    #[error("Token exchange returned no access token")]
    MissingToken,
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Not a valid Facebook page id or username: {0:?}")]
    InvalidPageId(String),
}

/// Read-only lookups against a social graph.
#[async_trait]
pub trait SocialGraphClient: Send + Sync {
    /// Default fields (name and id) of a page.
    async fn page_info(&self, page_id: &str) -> Result<FacebookPage, SocialAlertError>;

    /// The most recent post on a page's feed, if it has any.
    async fn latest_post(&self, page_id: &str) -> Result<Option<FeedPost>, SocialAlertError>;
}
