use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::LookupCache;
use crate::commands::{self, reply, Command};
use crate::error::BotError;
use crate::gateway::dispatcher::EventHandler;
use crate::gateway::events::{Envelope, Event};
use crate::lookup::{IpLookupClient, IpRecord, LookupError};
use crate::models::message::{ChannelMessage, CreateMessage};
use crate::rest::ApiClient;

/// Business handler: answers `/ip` lookups in guild channels.
pub struct IpLookupHandler {
    api: ApiClient,
    lookup: IpLookupClient,
    cache: LookupCache,
}

impl IpLookupHandler {
    pub fn new(api: ApiClient, lookup: IpLookupClient, cache: LookupCache) -> Self {
        Self { api, lookup, cache }
    }

    async fn on_message(&self, message: &ChannelMessage) -> Result<(), BotError> {
        let command = commands::parse(&message.content);
        let outbound = match command.name.as_str() {
            commands::CHANNEL_LOOKUP => self.channel_lookup(&command, message).await?,
            commands::DIRECT_LOOKUP => {
                CreateMessage::reply_text(&message.id, reply::DIRECT_NOT_READY)
            }
            _ => CreateMessage::reply_text(&message.id, reply::UNRECOGNIZED),
        };
        self.api
            .create_message(&message.channel_id, &outbound)
            .await?;
        Ok(())
    }

    async fn channel_lookup(
        &self,
        command: &Command,
        message: &ChannelMessage,
    ) -> Result<CreateMessage, BotError> {
        let Some(ip) = command.content.split_whitespace().next() else {
            return Ok(CreateMessage::reply_text(&message.id, reply::EMPTY_ADDRESS));
        };
        if let Some(record) = self.cached(ip) {
            debug!("cache hit for {ip}");
            return Ok(CreateMessage::reply_embed(
                &message.id,
                commands::lookup_embed(&record),
            ));
        }
        match self.lookup.lookup(ip).await {
            Ok(record) => {
                if let Err(e) = self.cache.put(ip, &record) {
                    warn!("failed to cache lookup for {ip}: {e}");
                }
                Ok(CreateMessage::reply_embed(
                    &message.id,
                    commands::lookup_embed(&record),
                ))
            }
            Err(LookupError::Rejected { code, msg }) => {
                debug!("lookup rejected {ip} (code {code}): {msg}");
                Ok(CreateMessage::reply_text(&message.id, reply::INVALID_ADDRESS))
            }
            Err(e @ (LookupError::Http(_) | LookupError::Decode(_))) => {
                warn!("lookup unavailable: {e}");
                Ok(CreateMessage::reply_text(
                    &message.id,
                    reply::LOOKUP_UNAVAILABLE,
                ))
            }
        }
    }

    fn cached(&self, ip: &str) -> Option<IpRecord> {
        match self.cache.get(ip) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("cache read failed for {ip}: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl EventHandler for IpLookupHandler {
    async fn handle(&self, _envelope: &Envelope, event: Event) -> Result<(), BotError> {
        match event {
            Event::AtMessageCreate(message) => self.on_message(&message).await,
            // READY is consumed by the dispatch loop before handlers run
            Event::Ready(_) => Ok(()),
            Event::Unknown(event_type) => {
                debug!("ignoring unhandled event {event_type}");
                Ok(())
            }
        }
    }
}
