//! Composing a configured filter with the filter of each query
//!
//! [`ConfigurableFilterProvider`] decorates a data provider. It holds one
//! programmatically set filter (the *configured* filter, of type `C`) and a
//! [`FilterCombiner`] that merges it with the filter carried by each query
//! (of type `Q`) into the filter the wrapped provider understands (`F`).
//!
//! The combiner only runs when the query has a filter. Without one, the
//! configured filter is forwarded as is, converted with `Into<F>`.
//!
//! Concurrent `set_filter` calls and in-flight queries are not ordered
//! beyond last-write-wins; callers needing more must synchronize themselves.

use crate::core::events::EventEnvelope;
use crate::core::provider::DataProvider;
use crate::core::query::Query;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Merges the configured filter (if any) with a query's filter
pub type FilterCombiner<Q, C, F> = Arc<dyn Fn(Option<&C>, &Q) -> F + Send + Sync>;

/// Data provider wrapper with a programmatically configurable filter
///
/// - `T`: item type
/// - `Q`: filter type of queries against this wrapper
/// - `C`: configured filter type
/// - `F`: filter type of the wrapped provider
pub struct ConfigurableFilterProvider<T, Q, C, F> {
    provider: Arc<dyn DataProvider<T, F>>,
    configured: RwLock<Option<C>>,
    combiner: FilterCombiner<Q, C, F>,
}

impl<T, Q, C, F> ConfigurableFilterProvider<T, Q, C, F>
where
    T: Clone + Send + Sync + 'static,
    Q: Send + Sync + 'static,
    C: Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Wrap `provider` with no configured filter
    pub fn new(
        provider: Arc<dyn DataProvider<T, F>>,
        combiner: impl Fn(Option<&C>, &Q) -> F + Send + Sync + 'static,
    ) -> Self {
        Self {
            provider,
            configured: RwLock::new(None),
            combiner: Arc::new(combiner),
        }
    }

    /// Replace the configured filter; `None` clears it
    ///
    /// Takes effect for every query issued afterwards.
    pub fn set_filter(&self, filter: impl Into<Option<C>>) {
        let filter = filter.into();
        tracing::debug!(configured = filter.is_some(), "Replacing configured filter");
        *self
            .configured
            .write()
            .unwrap_or_else(PoisonError::into_inner) = filter;
    }

    /// The configured filter, if one is set
    pub fn filter(&self) -> Option<C>
    where
        C: Clone,
    {
        self.configured
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The wrapped provider; queries sent to it skip the configured filter
    pub fn provider(&self) -> &Arc<dyn DataProvider<T, F>> {
        &self.provider
    }
}

impl<T, Q, C, F> ConfigurableFilterProvider<T, Q, C, F>
where
    T: Clone + Send + Sync + 'static,
    Q: Send + Sync + 'static,
    C: Clone + Into<F> + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Query for the wrapped provider: same window and sorting, effective filter
    fn derive_query(&self, query: &Query<T, Q>) -> Query<T, F> {
        let configured = self.filter();

        let effective = match query.filter() {
            None => configured.map(Into::into),
            Some(query_filter) => Some((self.combiner)(configured.as_ref(), query_filter)),
        };

        tracing::trace!(
            offset = query.offset(),
            limit = query.limit(),
            sort_orders = query.sort_orders().len(),
            combined = query.filter().is_some(),
            filtered = effective.is_some(),
            "Forwarding query to wrapped provider"
        );

        query.derive_with_filter(effective)
    }
}

#[async_trait]
impl<T, Q, C, F> DataProvider<T, Q> for ConfigurableFilterProvider<T, Q, C, F>
where
    T: Clone + Send + Sync + 'static,
    Q: Send + Sync + 'static,
    C: Clone + Into<F> + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    fn is_in_memory(&self) -> bool {
        self.provider.is_in_memory()
    }

    async fn size(&self, query: &Query<T, Q>) -> Result<usize> {
        let derived = self.derive_query(query);
        self.provider.size(&derived).await
    }

    async fn fetch(&self, query: &Query<T, Q>) -> Result<Vec<T>> {
        let derived = self.derive_query(query);
        self.provider.fetch(&derived).await
    }

    fn refresh_all(&self) {
        self.provider.refresh_all();
    }

    fn refresh_item(&self, item: T) {
        self.provider.refresh_item(item);
    }

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<T>> {
        self.provider.subscribe()
    }
}
