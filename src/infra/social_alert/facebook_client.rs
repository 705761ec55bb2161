use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::social_alert::{
    is_valid_page_id, FacebookCredentials, FacebookPage, FeedPost, SocialAlertError,
    SocialGraphClient,
};

const GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Thin Facebook Graph API client holding a long-lived access token.
pub struct FacebookGraphClient {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    data: Vec<FeedPost>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
    #[serde(default)]
    code: i64,
}

impl FacebookGraphClient {
    /// Exchanges the short-lived token for a long-lived one and returns a
    /// client that uses it.
    pub async fn connect(credentials: &FacebookCredentials) -> Result<Self, SocialAlertError> {
        Self::connect_to(GRAPH_BASE_URL, credentials).await
    }

    async fn connect_to(
        base_url: &str,
        credentials: &FacebookCredentials,
    ) -> Result<Self, SocialAlertError> {
        let client = Client::builder()
            .user_agent("WelcomeBot/0.1")
            .build()
            .map_err(|e| SocialAlertError::Http(e.to_string()))?;

        let resp = client
            .get(format!("{}/oauth/access_token", base_url))
            .query(&token_exchange_query(credentials))
            .send()
            .await
            .map_err(|e| SocialAlertError::Http(e.to_string()))?;

        let token: TokenResponse = decode(resp).await?;
        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(SocialAlertError::MissingToken)?;

        tracing::info!("Exchanged Facebook token for a long-lived one");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, SocialAlertError> {
        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(&[("access_token", self.access_token.as_str())])
            .query(extra)
            .send()
            .await
            .map_err(|e| SocialAlertError::Http(e.to_string()))?;

        decode(resp).await
    }
}

fn checked_page_id(page_id: &str) -> Result<&str, SocialAlertError> {
    if is_valid_page_id(page_id) {
        Ok(page_id)
    } else {
        Err(SocialAlertError::InvalidPageId(page_id.to_string()))
    }
}

fn token_exchange_query(credentials: &FacebookCredentials) -> [(&'static str, &str); 4] {
    [
        ("grant_type", "fb_exchange_token"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("fb_exchange_token", credentials.short_token.as_str()),
    ]
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SocialAlertError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| SocialAlertError::Http(e.to_string()))?;

    parse_body(status.is_success(), &body)
}

/// Graph errors come back as `{"error": {...}}`, usually with a 4xx status.
fn parse_body<T: DeserializeOwned>(success: bool, body: &str) -> Result<T, SocialAlertError> {
    if let Ok(envelope) = serde_json::from_str::<GraphErrorEnvelope>(body) {
        return Err(SocialAlertError::Api {
            code: envelope.error.code,
            message: envelope.error.message,
        });
    }

    if !success {
        return Err(SocialAlertError::Http(format!(
            "Graph API request failed: {}",
            body
        )));
    }

    serde_json::from_str(body).map_err(|e| SocialAlertError::Decode(e.to_string()))
}

#[async_trait]
impl SocialGraphClient for FacebookGraphClient {
    async fn page_info(&self, page_id: &str) -> Result<FacebookPage, SocialAlertError> {
        self.get(checked_page_id(page_id)?, &[]).await
    }

    async fn latest_post(&self, page_id: &str) -> Result<Option<FeedPost>, SocialAlertError> {
        let page_id = checked_page_id(page_id)?;
        let feed: FeedResponse = self
            .get(&format!("{}/feed", page_id), &[("limit", "1")])
            .await?;
        Ok(feed.data.into_iter().next())
    }
}
