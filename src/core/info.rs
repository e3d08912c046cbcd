// src/core/info.rs

//! Per-connection metadata records: named fields holding counters,
//! timestamps, flags, and opaque handles.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Well-known field names written by connection handlers and read by the
/// flow-control coordinator.
pub mod fields {
    /// Messages the connection may currently receive before re-acknowledgment.
    pub const RDY_COUNT: &str = "rdy_count";
    /// When the ready-count was last sent to the broker.
    pub const LAST_RDY: &str = "last_rdy";
    /// Upper bound on the ready-count the broker will accept for this connection.
    pub const MAX_RDY: &str = "max_rdy";
    /// Messages delivered but not yet finished or requeued.
    pub const MESSAGES_IN_FLIGHT: &str = "messages_in_flight";
    pub const FINISHED_COUNT: &str = "finished_count";
    pub const REQUEUED_COUNT: &str = "requeued_count";
    pub const LAST_MSG_TIMESTAMP: &str = "last_msg_timestamp";
}

/// A single field value inside a [`ConnInfo`] record.
///
/// The set of shapes is closed: flow-control math only ever needs counters,
/// timestamps, flags, and opaque broker-issued tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Count(i64),
    Timestamp(DateTime<Utc>),
    Flag(bool),
    /// An opaque token such as a broker-assigned message id.
    Handle(Bytes),
}

impl FieldValue {
    pub fn as_count(&self) -> Option<i64> {
        match self {
            FieldValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&Bytes> {
        match self {
            FieldValue::Handle(h) => Some(h),
            _ => None,
        }
    }
}

/// The metadata record kept for one connection.
///
/// An absent record and an empty record are indistinguishable to readers:
/// the store hands out `ConnInfo::default()` for ids it has never seen.
/// Field order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnInfo {
    entries: HashMap<String, FieldValue>,
}

impl ConnInfo {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    /// Sets a field, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.entries.insert(name.into(), value);
    }

    /// Builder-style [`set`](Self::set), convenient for literal records.
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    /// Merges the fields of `partial` into this record. On a field-name
    /// collision the incoming value wins; fields absent from `partial` are
    /// left untouched.
    pub fn merge(&mut self, partial: ConnInfo) {
        self.entries.extend(partial.entries);
    }

    /// Adds `delta` to the counter stored under `name`. An absent field or a
    /// field holding a non-counter value is treated as zero.
    pub fn bump(&mut self, name: &str, delta: i64) {
        let current = self.count(name).unwrap_or(0);
        self.entries
            .insert(name.to_string(), FieldValue::Count(current.saturating_add(delta)));
    }

    /// The counter under `name`, or `None` if absent or not a counter.
    pub fn count(&self, name: &str) -> Option<i64> {
        self.entries.get(name).and_then(FieldValue::as_count)
    }

    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.entries.get(name).and_then(FieldValue::as_timestamp)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.entries.get(name).and_then(FieldValue::as_flag)
    }

    pub fn handle(&self, name: &str) -> Option<&Bytes> {
        self.entries.get(name).and_then(FieldValue::as_handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, FieldValue)> for ConnInfo {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
