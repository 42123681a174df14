pub mod client;
pub mod dispatcher;
pub mod events;
pub mod heartbeat;
pub mod intents;
pub mod session;
pub mod state;

use std::fmt;

use tokio_tungstenite::tungstenite;

/// Connection-level errors. Frame decode problems are recoverable (the
/// frame is dropped); everything else tears the connection down.
#[derive(Debug)]
pub enum GatewayError {
    Connect(tungstenite::Error),
    Read(tungstenite::Error),
    Write(tungstenite::Error),
    Decode(serde_json::Error),
    /// The peer closed the connection, or it died mid-operation.
    Closed,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Connect(e) => write!(f, "gateway connect failed: {e}"),
            GatewayError::Read(e) => write!(f, "gateway read failed: {e}"),
            GatewayError::Write(e) => write!(f, "gateway write failed: {e}"),
            GatewayError::Decode(e) => write!(f, "frame decode failed: {e}"),
            GatewayError::Closed => write!(f, "gateway connection closed"),
        }
    }
}
