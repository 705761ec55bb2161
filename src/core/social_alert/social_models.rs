use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// App credentials plus a short-lived user token to exchange.
#[derive(Debug, Clone)]
pub struct FacebookCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub short_token: String,
}

impl FacebookCredentials {
    /// Reads `FACEBOOK_CLIENT_ID`, `FACEBOOK_CLIENT_SECRET` and
    /// `FACEBOOK_SHORT_TOKEN`. Returns `None` unless all three are set.
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            client_id: var("FACEBOOK_CLIENT_ID")?,
            client_secret: var("FACEBOOK_CLIENT_SECRET")?,
            short_token: var("FACEBOOK_SHORT_TOKEN")?,
        })
    }
}

/// Page ids are numeric and usernames are alphanumerics and dots. Anything
/// else would address a different Graph endpoint.
pub fn is_valid_page_id(page_id: &str) -> bool {
    !page_id.is_empty()
        && page_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.')
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacebookPage {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedPost {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "graph_time")]
    pub created_time: Option<DateTime<FixedOffset>>,
}

impl FeedPost {
    /// Link to the post on facebook.com. Feed ids look like `{page_id}_{post_id}`.
    pub fn permalink(&self) -> String {
        match self.id.split_once('_') {
            Some((page, post)) => format!("https://www.facebook.com/{}/posts/{}", page, post),
            None => format!("https://www.facebook.com/{}", self.id),
        }
    }
}

// The Graph API sends `2020-07-01T12:00:00+0000`, which isn't RFC 3339.
fn graph_time<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%z"))
        .transpose()
        .map_err(serde::de::Error::custom)
}
