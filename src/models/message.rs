use serde::{Deserialize, Serialize};

use super::embed::Embed;
use super::user::User;

/// Inbound channel message as delivered by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: String,
    pub channel_id: String,
    pub guild_id: String,
    #[serde(default)]
    pub content: String,
    pub timestamp: Option<String>,
    pub author: User,
    #[serde(default)]
    pub mentions: Vec<User>,
    #[serde(default)]
    pub direct_message: bool,
    pub seq_in_channel: Option<String>,
}

/// Outbound message for the create-message REST call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Setting this to the triggering message id makes the platform thread
    /// the message as a passive reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReference {
    pub message_id: String,
    #[serde(default)]
    pub ignore_get_message_error: bool,
}

impl CreateMessage {
    pub fn reply_text(reply_to: &str, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            msg_id: Some(reply_to.to_string()),
            ..Self::default()
        }
    }

    pub fn reply_embed(reply_to: &str, embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            msg_id: Some(reply_to.to_string()),
            ..Self::default()
        }
    }
}
