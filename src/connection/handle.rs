// src/connection/handle.rs

//! Handle and record types for live consumer connections.

use crate::connection::identity::ConsumerIdentity;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Sender half used to signal a connection task to shut down.
pub type ShutdownSender = broadcast::Sender<()>;

/// What the consumer retains for each live connection it owns, alongside the
/// connection's id. Cloneable so enumerations of live connections can hand
/// out (id, handle) pairs by value.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    shutdown: ShutdownSender,
}

impl ConnectionHandle {
    /// Creates a handle and the receiver its connection task listens on.
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown, rx) = broadcast::channel(1);
        (Self { shutdown }, rx)
    }

    /// Subscribes another listener to this connection's shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    /// Signals the connection task to terminate. Returns the number of
    /// listeners that received the signal; zero means the task is already gone.
    pub fn signal_shutdown(&self) -> usize {
        self.shutdown.send(()).unwrap_or(0)
    }
}

/// A connection task's own view of who it is and where it points.
/// Carries everything identity derivation needs.
#[derive(Debug, Clone)]
pub struct ConnectionRecord {
    /// The consumer this connection belongs to.
    pub identity: ConsumerIdentity,
    /// Remote broker host.
    pub host: String,
    /// Remote broker port.
    pub port: u16,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
}

impl ConnectionRecord {
    pub fn new(identity: ConsumerIdentity, host: impl Into<String>, port: u16) -> Self {
        Self {
            identity,
            host: host.into(),
            port,
            connected_at: Utc::now(),
        }
    }
}
