use std::fmt;

use reqwest::Client;

use crate::models::message::{ChannelMessage, CreateMessage};
use crate::token::Token;

#[derive(Debug)]
pub enum RestError {
    Http(reqwest::Error),
    Api { status: u16, body: String },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Http(e) => write!(f, "HTTP error: {e}"),
            RestError::Api { status, body } => {
                write!(f, "api returned {status}: {body}")
            }
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(e: reqwest::Error) -> Self {
        RestError::Http(e)
    }
}

/// Gateway-URL lookup result from `GET /gateway/bot`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GatewayBot {
    pub url: String,
    pub shards: u32,
}

/// Open-API client: resolves the gateway URL and posts reply messages.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    authorization: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: &Token) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            authorization: token.authorization(),
        }
    }

    /// Resolves the websocket URL and recommended shard count.
    pub async fn gateway_bot(&self) -> Result<GatewayBot, RestError> {
        let url = format!("{}/gateway/bot", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.authorization)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RestError::Api { status, body });
        }
        resp.json().await.map_err(RestError::Http)
    }

    /// Posts a message to a channel, returning the message the platform
    /// created for it.
    pub async fn create_message(
        &self,
        channel_id: &str,
        message: &CreateMessage,
    ) -> Result<ChannelMessage, RestError> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.authorization)
            .json(message)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RestError::Api { status, body });
        }
        resp.json().await.map_err(RestError::Http)
    }
}
