use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one gateway connection. `Closed` is terminal; there is no
/// transition back to `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Authenticating,
    Ready,
    Closed,
}

/// Atomic cell holding the current `ConnectionState`.
#[derive(Debug)]
pub struct AtomicConnectionState(AtomicU8);

impl AtomicConnectionState {
    pub const fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> ConnectionState {
        match self.0.load(Ordering::SeqCst) {
            0 => ConnectionState::Disconnected,
            1 => ConnectionState::Connected,
            2 => ConnectionState::Authenticating,
            3 => ConnectionState::Ready,
            _ => ConnectionState::Closed,
        }
    }

    pub fn store(&self, state: ConnectionState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        let state = AtomicConnectionState::new(ConnectionState::Disconnected);
        assert_eq!(state.load(), ConnectionState::Disconnected);

        state.store(ConnectionState::Connected);
        assert_eq!(state.load(), ConnectionState::Connected);

        state.store(ConnectionState::Authenticating);
        assert_eq!(state.load(), ConnectionState::Authenticating);

        state.store(ConnectionState::Ready);
        assert_eq!(state.load(), ConnectionState::Ready);

        state.store(ConnectionState::Closed);
        assert_eq!(state.load(), ConnectionState::Closed);
    }
}
