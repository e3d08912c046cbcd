// src/core/errors.rs

//! Defines the primary error type for the client library.

use thiserror::Error;

/// The main error enum, representing all possible failures within the client.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatherQError {
    /// The connection-info store worker is no longer running. Operations issued
    /// against a torn-down store fail with this variant rather than hanging.
    #[error("connection info store is closed")]
    StoreClosed,

    /// A caller-supplied closure panicked while running inside the store worker.
    /// The panic is contained at the worker boundary; the store itself stays usable.
    #[error("callback panicked inside the store worker: {0}")]
    CallbackPanicked(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal Client Error: {0}")]
    Internal(String),
}
