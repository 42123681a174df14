use serde::{Deserialize, Serialize};

use super::intents::Intents;
use crate::token::Token;

/// Shard assignment for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardConfig {
    pub shard_id: u32,
    pub shard_count: u32,
}

/// Mutable facts about one logical gateway connection.
///
/// `id` and `shards` are written once, by ready bookkeeping; everything else
/// is fixed at construction. A session belongs to exactly one client.
#[derive(Debug, Clone)]
pub struct Session {
    pub url: String,
    /// Empty until the server assigns one in the ready event.
    pub id: String,
    pub token: Token,
    pub intents: Intents,
    pub shards: ShardConfig,
}

impl Session {
    /// Session for the startup path: shard 0 of the recommended count.
    pub fn single_shard(
        url: impl Into<String>,
        shard_count: u32,
        token: Token,
        intents: Intents,
    ) -> Self {
        Self {
            url: url.into(),
            id: String::new(),
            token,
            intents,
            shards: ShardConfig {
                shard_id: 0,
                shard_count,
            },
        }
    }
}

/// Bot identity delivered in the ready event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}
