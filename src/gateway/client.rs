use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::dispatcher::EventHandler;
use super::events::{opcode, Envelope, Event, HelloData, ReadyData};
use super::heartbeat::{HeartbeatTimer, DEFAULT_HEARTBEAT_INTERVAL};
use super::session::{GatewayUser, Session, ShardConfig};
use super::state::{AtomicConnectionState, ConnectionState};
use super::GatewayError;

/// Inbound frames buffered before the reader blocks.
pub const QUEUE_SIZE: usize = 5000;

const ERROR_CHANNEL_SIZE: usize = 10;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Client for one gateway connection.
///
/// Owns the socket, the bounded inbound queue, the heartbeat timer and the
/// error-signal channel; runs the connect/identify/listen lifecycle with a
/// reader loop, a dispatch loop and the main select loop. Once closed it
/// never reconnects.
pub struct GatewayClient {
    session: Arc<RwLock<Session>>,
    user: Arc<RwLock<Option<GatewayUser>>>,
    state: Arc<AtomicConnectionState>,
    handler: Arc<dyn EventHandler>,
    queue_capacity: usize,
}

impl GatewayClient {
    pub fn new(session: Session, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            user: Arc::new(RwLock::new(None)),
            state: Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected)),
            handler,
            queue_capacity: QUEUE_SIZE,
        }
    }

    /// Overrides the inbound queue capacity fixed at construction.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state.load()
    }

    /// Snapshot of the session, including whatever ready bookkeeping has
    /// written so far.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Bot identity from the ready event, if it has arrived.
    pub async fn user(&self) -> Option<GatewayUser> {
        self.user.read().await.clone()
    }

    /// Connects, identifies and listens until the connection dies. Returns
    /// the error that terminated it; the client is `Closed` afterwards and
    /// is not reusable.
    pub async fn run(&self) -> Result<(), GatewayError> {
        let (url, identify) = {
            let session = self.session.read().await;
            (session.url.clone(), Envelope::identify(&session)?)
        };
        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(GatewayError::Connect)?;
        self.state.store(ConnectionState::Connected);
        tracing::info!("connected to gateway at {url}");

        let (sink, stream) = socket.split();
        let (error_tx, mut error_rx) = mpsc::channel::<GatewayError>(ERROR_CHANNEL_SIZE);
        let (queue_tx, queue_rx) = mpsc::channel::<Envelope>(self.queue_capacity);
        let (interval_tx, mut interval_rx) = watch::channel(DEFAULT_HEARTBEAT_INTERVAL);

        let mut writer = FrameWriter {
            sink,
            error_tx: error_tx.clone(),
        };

        self.state.store(ConnectionState::Authenticating);
        if writer.send(&identify).await.is_err() {
            writer.close().await;
            self.state.store(ConnectionState::Closed);
            return Err(error_rx.recv().await.unwrap_or(GatewayError::Closed));
        }

        let reader = tokio::spawn(read_loop(stream, queue_tx, interval_tx, error_tx));
        let dispatch = tokio::spawn(dispatch_loop(
            queue_rx,
            Arc::clone(&self.session),
            Arc::clone(&self.user),
            Arc::clone(&self.state),
            Arc::clone(&self.handler),
        ));

        let mut timer = HeartbeatTimer::new(DEFAULT_HEARTBEAT_INTERVAL);
        let mut interval_updates_open = true;
        let result = loop {
            tokio::select! {
                maybe_err = error_rx.recv() => {
                    let err = maybe_err.unwrap_or(GatewayError::Closed);
                    tracing::warn!("gateway connection failed: {err}");
                    break Err(err);
                }
                changed = interval_rx.changed(), if interval_updates_open => {
                    match changed {
                        Ok(()) => {
                            let period = *interval_rx.borrow_and_update();
                            timer.reset(period);
                        }
                        Err(_) => interval_updates_open = false,
                    }
                }
                _ = timer.tick() => {
                    // a failed send lands on the error channel and breaks
                    // the loop on the next iteration
                    let _ = writer.send(&Envelope::heartbeat()).await;
                }
            }
        };

        writer.close().await;
        self.state.store(ConnectionState::Closed);
        let _ = reader.await;
        let _ = dispatch.await;
        result
    }
}

/// Single funnel for socket writes. The identify frame and every heartbeat
/// go through here, so any write failure reaches the error-signal channel
/// no matter which caller hit it.
struct FrameWriter {
    sink: WsSink,
    error_tx: mpsc::Sender<GatewayError>,
}

impl FrameWriter {
    async fn send(&mut self, envelope: &Envelope) -> Result<(), GatewayError> {
        let text = envelope.encode()?;
        tracing::debug!("gateway send: {text}");
        if let Err(e) = self.sink.send(Message::Text(text.into())).await {
            tracing::warn!("gateway write failed: {e}");
            let _ = self.error_tx.try_send(GatewayError::Write(e));
            return Err(GatewayError::Closed);
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Err(e) = self.sink.close().await {
            tracing::debug!("error closing gateway socket: {e}");
        }
    }
}

/// Reader loop: decode, intercept built-ins, enqueue everything else. Exits
/// only when the socket read fails, closing the queue on the way out.
async fn read_loop(
    mut stream: WsStream,
    queue: mpsc::Sender<Envelope>,
    interval_tx: watch::Sender<Duration>,
    error_tx: mpsc::Sender<GatewayError>,
) {
    let err = loop {
        let message = match stream.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::warn!("gateway read failed: {e}");
                break GatewayError::Read(e);
            }
            None => {
                tracing::info!("gateway closed the connection");
                break GatewayError::Closed;
            }
        };
        let text = match message {
            Message::Text(text) => text,
            Message::Close(frame) => {
                tracing::info!("gateway sent close frame: {frame:?}");
                continue;
            }
            _ => continue,
        };
        let envelope = match Envelope::decode(text.as_str()) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("dropping undecodable frame: {e}");
                continue;
            }
        };
        tracing::debug!("gateway recv: {}", envelope.raw);
        if intercept_builtin(&envelope, &interval_tx) {
            continue;
        }
        if queue.send(envelope).await.is_err() {
            break GatewayError::Closed;
        }
    };
    drop(queue);
    let _ = error_tx.send(err).await;
}

/// Consumes control-plane frames before they can compete for queue
/// capacity. Returns true when the frame was handled here.
fn intercept_builtin(envelope: &Envelope, interval_tx: &watch::Sender<Duration>) -> bool {
    match envelope.op {
        opcode::HELLO => {
            match envelope.data_as::<HelloData>() {
                Ok(hello) if hello.heartbeat_interval > 0 => {
                    tracing::info!("server heartbeat interval: {}ms", hello.heartbeat_interval);
                    let _ = interval_tx.send(Duration::from_millis(hello.heartbeat_interval));
                }
                Ok(_) => {
                    tracing::warn!("hello carried a zero heartbeat interval, keeping current cadence");
                }
                Err(e) => {
                    tracing::warn!("malformed hello payload, keeping current cadence: {e}");
                }
            }
            true
        }
        _ => false,
    }
}

/// Dispatch loop: pops envelopes in arrival order, applies ready
/// bookkeeping in place and hands everything else to the registered
/// handler. Exits once the queue is closed and drained.
async fn dispatch_loop(
    mut queue: mpsc::Receiver<Envelope>,
    session: Arc<RwLock<Session>>,
    user: Arc<RwLock<Option<GatewayUser>>>,
    state: Arc<AtomicConnectionState>,
    handler: Arc<dyn EventHandler>,
) {
    while let Some(envelope) = queue.recv().await {
        match Event::from_envelope(&envelope) {
            Ok(Some(Event::Ready(ready))) => {
                apply_ready(ready, &session, &user).await;
                state.store(ConnectionState::Ready);
            }
            Ok(Some(event)) => {
                if let Err(e) = handler.handle(&envelope, event).await {
                    tracing::warn!("event handler failed: {e}");
                }
            }
            Ok(None) => {
                tracing::debug!("ignoring control frame op {}", envelope.op);
            }
            Err(e) => {
                tracing::warn!("dropping event with undecodable payload: {e}");
            }
        }
    }
    tracing::debug!("inbound queue closed, dispatch loop exiting");
}

async fn apply_ready(
    ready: ReadyData,
    session: &RwLock<Session>,
    user: &RwLock<Option<GatewayUser>>,
) {
    let mut session = session.write().await;
    session.id = ready.session_id.clone();
    if let [shard_id, shard_count] = ready.shard[..] {
        session.shards = ShardConfig {
            shard_id,
            shard_count,
        };
    }
    tracing::info!(
        "session ready: id={} user={} bot={}",
        session.id,
        ready.user.username,
        ready.user.bot
    );
    *user.write().await = Some(ready.user);
}
