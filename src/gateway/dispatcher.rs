use async_trait::async_trait;

use super::events::{Envelope, Event};
use crate::error::BotError;

/// Business-event callback handed to the client at construction.
///
/// Invoked from the dispatch loop for every frame that is neither built-in
/// nor the ready event. A returned error is logged by the loop and never
/// propagated into the connection lifecycle.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, envelope: &Envelope, event: Event) -> Result<(), BotError>;
}
