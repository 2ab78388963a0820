//! The data provider contract
//!
//! A data provider answers [`Query`]s with a count of matching items and a
//! window of those items. Consumers never need to know whether the items
//! live in memory or behind a remote back end. [`DataProvider::is_in_memory`]
//! tells them whether in-process post-filtering or sorting is possible.

use crate::core::events::{DataChangeEvent, EventEnvelope};
use crate::core::query::Query;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Service trait for querying items of type `T` with filters of type `F`
///
/// Implementations are agnostic to where the items live. Errors raised by the
/// underlying source are returned as-is.
#[async_trait]
pub trait DataProvider<T, F>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Whether all items are held in process memory
    fn is_in_memory(&self) -> bool;

    /// Number of items matching the query's filter
    ///
    /// Offset and limit are not applied to the count.
    async fn size(&self, query: &Query<T, F>) -> Result<usize>;

    /// Items matching the query, sorted and windowed as requested
    async fn fetch(&self, query: &Query<T, F>) -> Result<Vec<T>>;

    /// Notify subscribers that any item may have changed
    fn refresh_all(&self);

    /// Notify subscribers that one item changed
    fn refresh_item(&self, item: T);

    /// Receive change notifications published after this call
    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<T>>;
}

/// Drain pending events from a receiver without waiting
///
/// Lagged receivers skip what they missed and keep draining.
pub fn drain_events<T: Clone>(
    rx: &mut broadcast::Receiver<EventEnvelope<T>>,
) -> Vec<DataChangeEvent<T>> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(envelope) => events.push(envelope.event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}
