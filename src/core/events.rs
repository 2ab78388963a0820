//! Change notifications for data providers
//!
//! Consumers that display provider data (grids, listings) subscribe to a
//! provider and re-query when told the data changed. The [`DataEventBus`]
//! uses `tokio::sync::broadcast` so any number of consumers can listen.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut rx = provider.subscribe();
//!
//! provider.refresh_all();
//!
//! if let Ok(envelope) = rx.recv().await {
//!     assert!(envelope.event.is_refresh_all());
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default buffer size for provider event channels
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// What changed in a provider's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "item", rename_all = "snake_case")]
pub enum DataChangeEvent<T> {
    /// Any item may have changed; consumers should re-query everything
    RefreshAll,
    /// A single item changed; consumers may refresh just that item
    RefreshItem(T),
}

impl<T> DataChangeEvent<T> {
    pub fn is_refresh_all(&self) -> bool {
        matches!(self, DataChangeEvent::RefreshAll)
    }

    /// The changed item, for item refreshes
    pub fn item(&self) -> Option<&T> {
        match self {
            DataChangeEvent::RefreshAll => None,
            DataChangeEvent::RefreshItem(item) => Some(item),
        }
    }
}

/// Envelope wrapping a change event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    /// Unique event ID
    pub id: Uuid,
    /// When the event was published
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: DataChangeEvent<T>,
}

impl<T> EventEnvelope<T> {
    /// Create a new event envelope
    pub fn new(event: DataChangeEvent<T>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus owned by a provider
///
/// The bus is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct DataEventBus<T> {
    sender: broadcast::Sender<EventEnvelope<T>>,
}

impl<T: Clone> DataEventBus<T> {
    /// Create a new bus with the given channel capacity (at least 1)
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Without subscribers the event is simply dropped.
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, event: DataChangeEvent<T>) -> usize {
        // send() returns Err only if there are no receivers, which is fine
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<T>> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Default for DataEventBus<T> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
