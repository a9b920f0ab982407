//! Notification bus trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the notification bus.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The message could not be handed to the broker.
    #[error("Notification publish failed: {0}")]
    Publish(String),
}

/// Trait for publishing JSON messages to downstream consumers.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    /// Publishes a payload to the named topic.
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), NotificationError>;
}

#[derive(Debug, Default)]
struct InMemoryBusState {
    published: Vec<(String, Value)>,
    fail_on_publish: bool,
}

/// In-memory notification bus for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationBus {
    state: Arc<RwLock<InMemoryBusState>>,
}

impl InMemoryNotificationBus {
    /// Creates a new in-memory notification bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the bus to fail on the next publish call.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns the number of accepted messages across all topics.
    pub fn publish_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }

    /// Returns the payloads accepted for a topic, in publish order.
    pub fn messages_for(&self, topic: &str) -> Vec<Value> {
        self.state
            .read()
            .unwrap()
            .published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationBus for InMemoryNotificationBus {
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), NotificationError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_publish {
            return Err(NotificationError::Publish("Broker unavailable".to_string()));
        }

        state.published.push((topic.to_string(), payload));
        Ok(())
    }
}
