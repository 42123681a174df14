use std::sync::OnceLock;

use regex::Regex;

use crate::lookup::IpRecord;
use crate::models::embed::{Embed, EmbedField, EmbedThumbnail};

pub const CHANNEL_LOOKUP: &str = "/ip";
pub const DIRECT_LOOKUP: &str = "/ipdm";

const THUMBNAIL_URL: &str =
    "https://tva1.sinaimg.cn/large/e6c9d24egy1h2bjbcbuokj20bw0bwaa5.jpg";

// Mention markup and the non-breaking spaces the chat client pads it with.
const SPACE_CHARS: &[char] = &[' ', '\u{a0}'];

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<@!?\d+>").expect("mention pattern is valid"))
}

/// Strips mention markup and surrounding padding from raw message content.
pub fn sanitize(input: &str) -> String {
    mention_pattern()
        .replace_all(input, "")
        .trim_matches(SPACE_CHARS)
        .to_string()
}

#[derive(Debug, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub content: String,
}

/// Splits sanitized content into a command name and its argument text.
pub fn parse(input: &str) -> Command {
    let cleaned = sanitize(input);
    match cleaned.split_once(char::is_whitespace) {
        Some((name, content)) => Command {
            name: name.to_string(),
            content: content.trim_matches(SPACE_CHARS).to_string(),
        },
        None => Command {
            name: cleaned,
            content: String::new(),
        },
    }
}

pub mod reply {
    pub const EMPTY_ADDRESS: &str = "Give me an address to look up, e.g. /ip 8.8.8.8";
    pub const INVALID_ADDRESS: &str = "That does not look like a valid address, try again";
    pub const LOOKUP_UNAVAILABLE: &str = "The lookup service is unavailable right now, try later";
    pub const DIRECT_NOT_READY: &str = "Direct-message lookup is not available yet";
    pub const UNRECOGNIZED: &str = "Unknown command, try /ip <address>";
}

/// Renders a lookup result as a reply embed.
pub fn lookup_embed(record: &IpRecord) -> Embed {
    Embed {
        title: Some("IP lookup result".to_string()),
        prompt: format!("Lookup result for {}", record.ip),
        thumbnail: Some(EmbedThumbnail {
            url: THUMBNAIL_URL.to_string(),
        }),
        fields: vec![
            EmbedField {
                name: format!("address: {}", record.ip),
            },
            EmbedField {
                name: format!("carrier: {}", record.isp),
            },
            EmbedField {
                name: format!("details: {}", record.desc),
            },
        ],
        ..Default::default()
    }
}
