// src/connection/identity.rs

//! Deterministic identity derivation for consumer connections.
//!
//! Every connection a consumer opens is keyed by a [`ConnId`] built from the
//! consumer's own identity plus the broker's host and port. The same logical
//! connection always derives the same id, no matter which entry point the
//! caller reaches it through.

use crate::connection::handle::{ConnectionHandle, ConnectionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The stable identity of one consumer: the topic it reads and the channel
/// it joins on that topic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsumerIdentity {
    pub topic: String,
    pub channel: String,
}

impl ConsumerIdentity {
    pub fn new(topic: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for ConsumerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.topic, self.channel)
    }
}

/// An opaque, deterministic string key identifying one logical connection.
///
/// Identical (consumer identity, host, port) triples always yield the
/// identical id; distinct triples yield distinct ids. Topic and channel
/// names never contain `:` (see `ConsumerConfig::validate`), so the joined
/// form cannot collide across triples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(String);

impl ConnId {
    /// The canonical derivation: consumer identity joined with the remote
    /// address.
    pub fn from_address(identity: &ConsumerIdentity, host: &str, port: u16) -> Self {
        ConnId(format!("{identity}:{host}:{port}"))
    }

    /// Extracts the id from an (id, handle) pair, as produced by enumerating
    /// a consumer's live connections. Performs no recomputation.
    pub fn from_existing_pair(pair: &(ConnId, ConnectionHandle)) -> Self {
        pair.0.clone()
    }

    /// Derives the id from a connection task's own state record. Delegates
    /// to [`from_address`](Self::from_address).
    pub fn from_connection_record(record: &ConnectionRecord) -> Self {
        Self::from_address(&record.identity, &record.host, record.port)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConnId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
