use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Capability bitmask requesting which event categories the gateway
/// delivers. Serialized as the bare number the wire expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intents(u32);

impl Intents {
    pub const GUILDS: Intents = Intents(1 << 0);
    pub const GUILD_MEMBERS: Intents = Intents(1 << 1);
    pub const GUILD_MESSAGES: Intents = Intents(1 << 9);
    pub const GUILD_MESSAGE_REACTIONS: Intents = Intents(1 << 10);
    pub const DIRECT_MESSAGE: Intents = Intents(1 << 12);
    pub const INTERACTION: Intents = Intents(1 << 26);
    pub const MESSAGE_AUDIT: Intents = Intents(1 << 27);
    pub const FORUMS_EVENT: Intents = Intents(1 << 28);
    pub const AUDIO_ACTION: Intents = Intents(1 << 29);
    pub const PUBLIC_GUILD_MESSAGES: Intents = Intents(1 << 30);

    pub const fn empty() -> Intents {
        Intents(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Intents) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Intents {
    type Output = Intents;

    fn bitor(self, rhs: Intents) -> Intents {
        Intents(self.0 | rhs.0)
    }
}
