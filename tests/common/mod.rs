#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use ipbot::error::BotError;
use ipbot::gateway::dispatcher::EventHandler;
use ipbot::gateway::events::{Envelope, Event};
use ipbot::gateway::intents::Intents;
use ipbot::gateway::session::Session;
use ipbot::token::Token;

/// In-process gateway endpoint that accepts a single client connection.
///
/// Frames pushed through `send` go to the client, frames the client sends
/// arrive on `received`. `kill` severs the socket without a close handshake.
pub struct MockGateway {
    pub url: String,
    pub received: mpsc::UnboundedReceiver<String>,
    out: Option<mpsc::UnboundedSender<String>>,
}

impl MockGateway {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (recv_tx, recv_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            loop {
                tokio::select! {
                    frame = out_rx.recv() => match frame {
                        Some(text) => {
                            if ws.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    inbound = ws.next() => match inbound {
                        Some(Ok(Message::Text(text))) => {
                            let _ = recv_tx.send(text.as_str().to_string());
                        }
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    },
                }
            }
        });

        Self {
            url: format!("ws://127.0.0.1:{}", addr.port()),
            received: recv_rx,
            out: Some(out_tx),
        }
    }

    /// Queues a frame for delivery to the connected client.
    pub fn send(&self, frame: impl Into<String>) {
        self.out
            .as_ref()
            .expect("connection already killed")
            .send(frame.into())
            .unwrap();
    }

    /// Drops the connection after flushing queued frames, with no close
    /// handshake. The client observes a read failure.
    pub fn kill(&mut self) {
        self.out.take();
    }

    pub async fn recv_raw(&mut self) -> String {
        timeout(Duration::from_secs(5), self.received.recv())
            .await
            .expect("timed out waiting for a client frame")
            .expect("connection ended before a client frame arrived")
    }

    pub async fn recv_json(&mut self) -> serde_json::Value {
        serde_json::from_str(&self.recv_raw().await).unwrap()
    }
}

/// Handler that records every envelope it is given. The gated variant holds
/// each call until a permit is released, so tests can wedge the dispatch
/// pipeline and watch backpressure; the failing variant records and then
/// reports an error for every event.
pub struct RecordingHandler {
    seen: mpsc::UnboundedSender<Envelope>,
    gate: Option<Arc<Semaphore>>,
    fail: bool,
}

impl RecordingHandler {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                seen: tx,
                gate: None,
                fail: false,
            }),
            rx,
        )
    }

    pub fn gated() -> (Arc<Self>, mpsc::UnboundedReceiver<Envelope>, Arc<Semaphore>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = Arc::new(Semaphore::new(0));
        (
            Arc::new(Self {
                seen: tx,
                gate: Some(Arc::clone(&gate)),
                fail: false,
            }),
            rx,
            gate,
        )
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                seen: tx,
                gate: None,
                fail: true,
            }),
            rx,
        )
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, envelope: &Envelope, _event: Event) -> Result<(), BotError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let _ = self.seen.send(envelope.clone());
        if self.fail {
            return Err(BotError::Config("induced handler failure".to_string()));
        }
        Ok(())
    }
}

pub fn session(url: &str) -> Session {
    Session::single_shard(
        url,
        1,
        Token::bot(12, "secret".to_string()),
        Intents::PUBLIC_GUILD_MESSAGES,
    )
}

pub fn hello(interval_ms: u64) -> String {
    serde_json::json!({ "op": 10, "d": { "heartbeat_interval": interval_ms } }).to_string()
}

pub fn dispatch(seq: u64, event_type: &str, data: serde_json::Value) -> String {
    serde_json::json!({ "op": 0, "s": seq, "t": event_type, "d": data }).to_string()
}

pub fn ready(session_id: &str, shard: [u32; 2]) -> String {
    dispatch(
        1,
        "READY",
        serde_json::json!({
            "version": 1,
            "session_id": session_id,
            "user": { "id": "bot-1", "username": "ipbot", "bot": true },
            "shard": shard,
        }),
    )
}
