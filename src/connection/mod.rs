// src/connection/mod.rs

//! Connection identity derivation and per-connection handle types.

pub mod handle;
pub mod identity;

pub use handle::{ConnectionHandle, ConnectionRecord, ShutdownSender};
pub use identity::{ConnId, ConsumerIdentity};
