// src/lib.rs

pub mod config;
pub mod connection;
pub mod core;

// Re-export
pub use crate::connection::{ConnId, ConsumerIdentity};
pub use crate::core::{ConnInfo, ConnInfoStore, FeatherQError, FieldValue};
