// src/core/mod.rs

//! Core types of the client: errors, connection metadata records, and the
//! shared connection-info store.

pub mod errors;
pub mod info;
pub mod store;

pub use errors::FeatherQError;
pub use info::{ConnInfo, FieldValue};
pub use store::ConnInfoStore;
