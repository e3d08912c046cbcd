// tests/integration/fixtures.rs

//! Shared helpers for store integration tests.

use featherq_client::{ConnId, ConnInfoStore, ConsumerIdentity};
use tracing_subscriber::EnvFilter;

/// Sets up minimal tracing for tests; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_test_writer()
        .try_init();
}

pub fn test_identity() -> ConsumerIdentity {
    ConsumerIdentity::new("orders", "archiver")
}

pub fn conn(host: &str, port: u16) -> ConnId {
    ConnId::from_address(&test_identity(), host, port)
}

pub fn store() -> ConnInfoStore {
    init_tracing();
    ConnInfoStore::new()
}
