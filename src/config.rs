// src/config.rs

//! Manages consumer configuration: identity and store tuning knobs.

use crate::connection::identity::ConsumerIdentity;
use crate::core::FeatherQError;
use serde::{Deserialize, Serialize};

/// Maximum length of a topic or channel name, excluding the `#ephemeral` suffix.
const MAX_NAME_LEN: usize = 64;

/// Tuning for the connection-info store worker.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoreConfig {
    /// Depth of the request mailbox feeding the store worker. Callers issuing
    /// operations while the mailbox is full are backpressured, not dropped.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

fn default_mailbox_capacity() -> usize {
    128
}

/// Configuration for a single consumer: which topic/channel it reads and how
/// its shared state is tuned.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConsumerConfig {
    pub topic: String,
    pub channel: String,
    #[serde(default)]
    pub store: StoreConfig,
}

impl ConsumerConfig {
    pub fn new(topic: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            channel: channel.into(),
            store: StoreConfig::default(),
        }
    }

    /// The identity under which this consumer's connections derive their ids.
    pub fn identity(&self) -> ConsumerIdentity {
        ConsumerIdentity::new(self.topic.clone(), self.channel.clone())
    }

    /// Validates the configuration against the broker's naming rules.
    pub fn validate(&self) -> Result<(), FeatherQError> {
        validate_name(&self.topic, "topic")?;
        validate_name(&self.channel, "channel")?;
        if self.store.mailbox_capacity == 0 {
            return Err(FeatherQError::InvalidConfig(
                "store.mailbox_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Topic and channel names: `[A-Za-z0-9._-]`, 1 to 64 characters, with an
/// optional `#ephemeral` suffix. The broker rejects anything else, so the
/// client refuses to start with such a name.
fn validate_name(name: &str, kind: &str) -> Result<(), FeatherQError> {
    let base = name.strip_suffix("#ephemeral").unwrap_or(name);
    if base.is_empty() || base.len() > MAX_NAME_LEN {
        return Err(FeatherQError::InvalidConfig(format!(
            "{kind} name '{name}' must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }
    if let Some(bad) = base
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '_' | '-'))
    {
        return Err(FeatherQError::InvalidConfig(format!(
            "{kind} name '{name}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}
