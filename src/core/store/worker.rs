// src/core/store/worker.rs

//! The store's serialization point: a single task that exclusively owns the
//! id-to-info map and applies requests one at a time, in arrival order.

use crate::connection::identity::ConnId;
use crate::core::FeatherQError;
use crate::core::info::{ConnInfo, FieldValue};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// A caller-supplied read-modify-write step, applied to the current record
/// (empty if absent) to produce the record stored back under the same id.
pub(crate) type TransformFn = Box<dyn FnOnce(ConnInfo) -> ConnInfo + Send>;

/// A type-erased fold over one consistent view of the whole map. The public
/// API boxes the caller's accumulator as `Any` and downcasts it on reply.
pub(crate) type FoldFn =
    Box<dyn FnOnce(&HashMap<ConnId, ConnInfo>) -> Box<dyn Any + Send> + Send>;

pub(crate) enum StoreRequest {
    SnapshotAll {
        reply: oneshot::Sender<HashMap<ConnId, ConnInfo>>,
    },
    Fold {
        run: FoldFn,
        reply: oneshot::Sender<Result<Box<dyn Any + Send>, FeatherQError>>,
    },
    Get {
        id: ConnId,
        reply: oneshot::Sender<ConnInfo>,
    },
    GetFields {
        id: ConnId,
        names: Vec<String>,
        reply: oneshot::Sender<Vec<Option<FieldValue>>>,
    },
    Update {
        id: ConnId,
        transform: TransformFn,
        reply: oneshot::Sender<Result<(), FeatherQError>>,
    },
    Merge {
        id: ConnId,
        partial: ConnInfo,
        reply: oneshot::Sender<()>,
    },
    Delete {
        id: ConnId,
        reply: oneshot::Sender<()>,
    },
    Ids {
        reply: oneshot::Sender<Vec<ConnId>>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Runs until the mailbox closes or a `Shutdown` request arrives. Requests
/// still queued behind a shutdown are dropped, which resolves their callers'
/// reply channels as closed.
pub(crate) async fn run(mut rx: mpsc::Receiver<StoreRequest>) {
    let mut entries: HashMap<ConnId, ConnInfo> = HashMap::new();
    debug!("Connection info store worker started.");

    while let Some(request) = rx.recv().await {
        match request {
            StoreRequest::SnapshotAll { reply } => {
                let _ = reply.send(entries.clone());
            }
            StoreRequest::Fold { run, reply } => {
                let result = catch_unwind(AssertUnwindSafe(|| run(&entries))).map_err(|payload| {
                    let msg = panic_message(payload);
                    warn!("A fold callback panicked: {}. The store remains serviceable.", msg);
                    FeatherQError::CallbackPanicked(msg)
                });
                let _ = reply.send(result);
            }
            StoreRequest::Get { id, reply } => {
                let _ = reply.send(entries.get(&id).cloned().unwrap_or_default());
            }
            StoreRequest::GetFields { id, names, reply } => {
                let info = entries.get(&id);
                let values = names
                    .iter()
                    .map(|name| info.and_then(|i| i.get(name)).cloned())
                    .collect();
                let _ = reply.send(values);
            }
            StoreRequest::Update { id, transform, reply } => {
                // Read-transform-write as one unit; nothing else can touch
                // `entries` until the new record is stored back.
                let current = entries.get(&id).cloned().unwrap_or_default();
                match catch_unwind(AssertUnwindSafe(move || transform(current))) {
                    Ok(next) => {
                        if entries.insert(id.clone(), next).is_none() {
                            debug!("Created connection info entry for '{}'.", id);
                        }
                        let _ = reply.send(Ok(()));
                    }
                    Err(payload) => {
                        // The entry is left exactly as it was before the
                        // failed transform.
                        let msg = panic_message(payload);
                        warn!(
                            "An update callback for '{}' panicked: {}. The entry is unchanged.",
                            id, msg
                        );
                        let _ = reply.send(Err(FeatherQError::CallbackPanicked(msg)));
                    }
                }
            }
            StoreRequest::Merge { id, partial, reply } => {
                if !entries.contains_key(&id) {
                    debug!("Created connection info entry for '{}'.", id);
                }
                entries.entry(id).or_default().merge(partial);
                let _ = reply.send(());
            }
            StoreRequest::Delete { id, reply } => {
                if entries.remove(&id).is_some() {
                    debug!("Removed connection info entry for '{}'.", id);
                }
                let _ = reply.send(());
            }
            StoreRequest::Ids { reply } => {
                let _ = reply.send(entries.keys().cloned().collect());
            }
            StoreRequest::Len { reply } => {
                let _ = reply.send(entries.len());
            }
            StoreRequest::Shutdown { reply } => {
                let _ = reply.send(());
                break;
            }
        }
    }

    debug!(
        "Connection info store worker stopped; discarding {} entries.",
        entries.len()
    );
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
