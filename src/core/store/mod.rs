// src/core/store/mod.rs

//! The shared connection-info store.
//!
//! Many connection handler tasks read and mutate small per-connection records
//! (ready-counts, timestamps, in-flight totals) while the consumer's
//! coordinator periodically folds over all of them to make flow-control
//! decisions. Every operation is funneled through a single worker task that
//! exclusively owns the map, so each read-modify-write is indivisible and a
//! fold or snapshot always observes one consistent cut across every key,
//! without callers ever taking a lock.
//!
//! Operations are computation-only and O(record size); callers suspend until
//! the worker has applied their request and replied. The store's lifetime is
//! scoped to its owning consumer: created at consumer start, torn down via
//! [`shutdown`](ConnInfoStore::shutdown) (or by dropping every handle) when
//! the consumer stops. Operations against a torn-down store fail with
//! [`FeatherQError::StoreClosed`].
//!
//! # Caller obligation
//!
//! A closure passed to [`update_with`](ConnInfoStore::update_with) or
//! [`fold`](ConnInfoStore::fold) runs inside the worker and must not invoke
//! another operation on the same store: the worker cannot serve that nested
//! request while the closure holds it, so the nested call deadlocks. Panics
//! inside such closures are contained at the worker boundary and reported to
//! the issuing caller only.

mod worker;

use crate::config::StoreConfig;
use crate::connection::identity::ConnId;
use crate::core::FeatherQError;
use crate::core::info::{ConnInfo, FieldValue};
use std::any::Any;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use worker::StoreRequest;

/// A cloneable handle to the connection-info store. All clones address the
/// same underlying map; the handle is cheap to pass to every connection task.
///
/// Must be created from within a tokio runtime, since construction spawns
/// the owning worker task.
#[derive(Debug, Clone)]
pub struct ConnInfoStore {
    tx: mpsc::Sender<StoreRequest>,
}

impl ConnInfoStore {
    /// Creates a store with the default mailbox capacity.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));
        tokio::spawn(worker::run(rx));
        Self { tx }
    }

    /// The entire mapping as of a single consistent instant.
    pub async fn snapshot_all(&self) -> Result<HashMap<ConnId, ConnInfo>, FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::SnapshotAll { reply }).await?;
        Self::recv(rx).await
    }

    /// Folds `combine` over every (id, info) pair starting from `init`,
    /// executed inside the worker against one consistent view: no entry is
    /// half-updated mid-fold, and every mutation applied before this call
    /// is visible while none issued after it are.
    ///
    /// Iteration order across ids is unspecified.
    pub async fn fold<A, F>(&self, init: A, combine: F) -> Result<A, FeatherQError>
    where
        A: Send + 'static,
        F: FnMut(A, &ConnId, &ConnInfo) -> A + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        let mut combine = combine;
        let run: worker::FoldFn = Box::new(move |entries| {
            let mut acc = init;
            for (id, info) in entries {
                acc = combine(acc, id, info);
            }
            Box::new(acc) as Box<dyn Any + Send>
        });
        self.send(StoreRequest::Fold { run, reply }).await?;
        let folded = Self::recv(rx).await??;
        folded
            .downcast::<A>()
            .map(|acc| *acc)
            .map_err(|_| FeatherQError::Internal("fold accumulator type mismatch".into()))
    }

    /// The record for `id`, or an empty record if absent. Never fails for a
    /// missing id, and never creates an entry.
    pub async fn get(&self, id: &ConnId) -> Result<ConnInfo, FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Get { id: id.clone(), reply }).await?;
        Self::recv(rx).await
    }

    /// A single field of `id`'s record; `None` if the field or the whole
    /// entry is missing.
    pub async fn get_field(
        &self,
        id: &ConnId,
        name: &str,
    ) -> Result<Option<FieldValue>, FeatherQError> {
        let mut values = self.get_fields(id, &[name]).await?;
        Ok(values.pop().flatten())
    }

    /// Several fields of `id`'s record at once, returned in request order
    /// with `None` marking each missing field.
    pub async fn get_fields(
        &self,
        id: &ConnId,
        names: &[&str],
    ) -> Result<Vec<Option<FieldValue>>, FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::GetFields {
            id: id.clone(),
            names: names.iter().map(|name| name.to_string()).collect(),
            reply,
        })
        .await?;
        Self::recv(rx).await
    }

    /// Atomically reads the current record for `id` (empty if absent),
    /// applies `transform`, and stores the result back under `id`. Nothing
    /// can interleave between the read and the write. Creates the entry if
    /// it did not exist.
    pub async fn update_with<F>(&self, id: &ConnId, transform: F) -> Result<(), FeatherQError>
    where
        F: FnOnce(ConnInfo) -> ConnInfo + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Update {
            id: id.clone(),
            transform: Box::new(transform),
            reply,
        })
        .await?;
        Self::recv(rx).await?
    }

    /// Atomically merges the fields of `partial` into the record for `id`,
    /// creating the entry if absent. Colliding fields take the new value;
    /// all others are left untouched.
    pub async fn merge(&self, id: &ConnId, partial: ConnInfo) -> Result<(), FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Merge {
            id: id.clone(),
            partial,
            reply,
        })
        .await?;
        Self::recv(rx).await
    }

    /// Removes the entry for `id` entirely. A no-op if absent; subsequent
    /// reads observe the empty default again.
    pub async fn delete(&self, id: &ConnId) -> Result<(), FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Delete { id: id.clone(), reply }).await?;
        Self::recv(rx).await
    }

    /// The ids of every tracked connection.
    pub async fn ids(&self) -> Result<Vec<ConnId>, FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Ids { reply }).await?;
        Self::recv(rx).await
    }

    /// The number of tracked connections.
    pub async fn len(&self) -> Result<usize, FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Len { reply }).await?;
        Self::recv(rx).await
    }

    pub async fn is_empty(&self) -> Result<bool, FeatherQError> {
        Ok(self.len().await? == 0)
    }

    /// Stops the worker. The call returns once the worker has acknowledged;
    /// operations already queued behind the shutdown, and any issued later,
    /// resolve to [`FeatherQError::StoreClosed`].
    pub async fn shutdown(&self) -> Result<(), FeatherQError> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Shutdown { reply }).await?;
        Self::recv(rx).await
    }

    async fn send(&self, request: StoreRequest) -> Result<(), FeatherQError> {
        self.tx
            .send(request)
            .await
            .map_err(|_| FeatherQError::StoreClosed)
    }

    async fn recv<T>(rx: oneshot::Receiver<T>) -> Result<T, FeatherQError> {
        rx.await.map_err(|_| FeatherQError::StoreClosed)
    }
}

impl Default for ConnInfoStore {
    fn default() -> Self {
        Self::new()
    }
}
