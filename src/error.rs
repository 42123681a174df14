use std::fmt;

use crate::cache::CacheError;
use crate::lookup::LookupError;
use crate::rest::RestError;

/// Application-level error for startup wiring and business-event handling.
///
/// Connection-level gateway errors live in `gateway::GatewayError`; this enum
/// covers everything the event handler and the startup path can fail with.
#[derive(Debug)]
pub enum BotError {
    Config(String),
    Api(RestError),
    Lookup(LookupError),
    Cache(CacheError),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::Config(msg) => write!(f, "config error: {msg}"),
            BotError::Api(e) => write!(f, "open api error: {e}"),
            BotError::Lookup(e) => write!(f, "ip lookup error: {e}"),
            BotError::Cache(e) => write!(f, "cache error: {e}"),
        }
    }
}

impl From<RestError> for BotError {
    fn from(e: RestError) -> Self {
        BotError::Api(e)
    }
}

impl From<LookupError> for BotError {
    fn from(e: LookupError) -> Self {
        BotError::Lookup(e)
    }
}

impl From<CacheError> for BotError {
    fn from(e: CacheError) -> Self {
        BotError::Cache(e)
    }
}
