//! Lazy data providers backed by an external store
//!
//! A lazy provider never holds its dataset in memory: every [`Query`] is
//! answered by a [`BackEnd`], which does the filtering, sorting and paging.
//! [`BackEndDataProvider`] is the provider wrapped around a back end. It keeps
//! the default sort order state and mixes it into every fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! let provider = Arc::new(BackEndDataProvider::new(OrdersBackEnd::new(pool)));
//! provider.set_sort_order(Some(QuerySortOrder::descending("created_at")));
//!
//! let by_customer = provider.with_configurable_filter(
//!     |customer: Option<&Uuid>, status: &String| OrderFilter::new(customer.copied(), status),
//! );
//! by_customer.set_filter(customer_id);
//! ```

use crate::config::ProviderConfig;
use crate::core::events::{DataChangeEvent, DataEventBus, EventEnvelope};
use crate::core::filter::ConfigurableFilterProvider;
use crate::core::provider::DataProvider;
use crate::core::query::Query;
use crate::core::sort::QuerySortOrder;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// The store a lazy provider reads from
///
/// The query handed to a back end already carries the provider's default
/// sort orders after the query's own. Back ends apply filter, sort orders,
/// offset and limit themselves.
#[async_trait]
pub trait BackEnd: Send + Sync {
    /// Item type
    type Item: Clone + Send + Sync + 'static;

    /// Filter type understood by the store
    type Filter: Clone + Send + Sync + 'static;

    /// Items matching the query
    async fn fetch_from_back_end(
        &self,
        query: &Query<Self::Item, Self::Filter>,
    ) -> Result<Vec<Self::Item>>;

    /// Number of items matching the query's filter
    async fn size_in_back_end(&self, query: &Query<Self::Item, Self::Filter>) -> Result<usize>;
}

mod sealed {
    pub trait Sealed {}
}

/// Contract of a data provider that lazy loads items from a back end
///
/// Lazy providers are never in memory. The trait is sealed: the only
/// implementation is [`BackEndDataProvider`], and stores plug in through
/// [`BackEnd`], which has no way to claim otherwise.
pub trait LazyDataProvider<T, F>: DataProvider<T, F> + sealed::Sealed
where
    T: Clone + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    /// Replace the default sort orders
    ///
    /// Default sort orders are used when a query defines no sorting, and to
    /// order items the query's own sorting considers equal. An empty list
    /// clears them.
    fn set_sort_orders(&self, sort_orders: Vec<QuerySortOrder>);

    /// Replace the default sort orders with a single order, or clear them with `None`
    fn set_sort_order(&self, sort_order: Option<QuerySortOrder>) {
        self.set_sort_orders(sort_order.into_iter().collect());
    }

    /// Current default sort orders
    fn sort_orders(&self) -> Vec<QuerySortOrder>;

    /// Wrap this provider so a filter can be set programmatically and combined
    /// with the filter of each query
    ///
    /// `combiner` receives the configured filter (if any) and the query's
    /// filter, and returns the filter passed to this provider. It is only
    /// called when the query has a filter; otherwise the configured filter is
    /// passed through as is.
    ///
    /// The returned wrapper shares this provider; both stay usable.
    fn with_configurable_filter<Q, C>(
        self: &Arc<Self>,
        combiner: impl Fn(Option<&C>, &Q) -> F + Send + Sync + 'static,
    ) -> ConfigurableFilterProvider<T, Q, C, F>
    where
        Self: Sized + 'static,
        Q: Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        let provider: Arc<dyn DataProvider<T, F>> = self.clone();
        ConfigurableFilterProvider::new(provider, combiner)
    }

    /// Wrap this provider so a filter can be set programmatically, with no
    /// filtering through the query
    ///
    /// Queries against the wrapper use `Infallible` as filter type, so they
    /// cannot carry a filter at all:
    ///
    /// ```compile_fail
    /// # use backend_provider::core::query::Query;
    /// # use std::convert::Infallible;
    /// let query: Query<String, Infallible> = Query::new().with_filter("name".to_string());
    /// ```
    fn with_configured_filter_only(
        self: &Arc<Self>,
    ) -> ConfigurableFilterProvider<T, Infallible, F, F>
    where
        Self: Sized + 'static,
        F: Clone,
    {
        self.with_configurable_filter::<Infallible, F>(|_, query_filter| match *query_filter {})
    }
}

/// Lazy provider answering queries from a [`BackEnd`]
pub struct BackEndDataProvider<B: BackEnd> {
    backend: B,
    sort_orders: RwLock<Vec<QuerySortOrder>>,
    events: DataEventBus<B::Item>,
}

impl<B: BackEnd> BackEndDataProvider<B> {
    /// Create a provider with no default sort orders
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &ProviderConfig::default())
    }

    /// Create a provider from configuration
    pub fn with_config(backend: B, config: &ProviderConfig) -> Self {
        Self {
            backend,
            sort_orders: RwLock::new(config.default_sort_orders.clone()),
            events: DataEventBus::new(config.event_capacity),
        }
    }

    /// The wrapped back end
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Query's own sort orders followed by the defaults on other properties
    fn with_default_sort_orders(
        &self,
        query: &Query<B::Item, B::Filter>,
    ) -> Option<Query<B::Item, B::Filter>> {
        let defaults = self
            .sort_orders
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if defaults.is_empty() {
            return None;
        }

        let sorted: HashSet<&str> = query
            .sort_orders()
            .iter()
            .map(|order| order.sorted.as_str())
            .collect();

        let combined = query
            .sort_orders()
            .iter()
            .chain(
                defaults
                    .iter()
                    .filter(|order| !sorted.contains(order.sorted.as_str())),
            )
            .cloned()
            .collect();

        Some(query.derive_with_sort_orders(combined))
    }
}

impl<B: BackEnd> sealed::Sealed for BackEndDataProvider<B> {}

#[async_trait]
impl<B: BackEnd> DataProvider<B::Item, B::Filter> for BackEndDataProvider<B> {
    fn is_in_memory(&self) -> bool {
        false
    }

    async fn size(&self, query: &Query<B::Item, B::Filter>) -> Result<usize> {
        self.backend.size_in_back_end(query).await
    }

    async fn fetch(&self, query: &Query<B::Item, B::Filter>) -> Result<Vec<B::Item>> {
        match self.with_default_sort_orders(query) {
            Some(sorted) => self.backend.fetch_from_back_end(&sorted).await,
            None => self.backend.fetch_from_back_end(query).await,
        }
    }

    fn refresh_all(&self) {
        let receivers = self.events.publish(DataChangeEvent::RefreshAll);
        tracing::debug!(receivers, "Published refresh of all items");
    }

    fn refresh_item(&self, item: B::Item) {
        let receivers = self.events.publish(DataChangeEvent::RefreshItem(item));
        tracing::debug!(receivers, "Published refresh of one item");
    }

    fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<B::Item>> {
        self.events.subscribe()
    }
}

impl<B: BackEnd> LazyDataProvider<B::Item, B::Filter> for BackEndDataProvider<B> {
    fn set_sort_orders(&self, sort_orders: Vec<QuerySortOrder>) {
        tracing::debug!(count = sort_orders.len(), "Replacing default sort orders");
        *self
            .sort_orders
            .write()
            .unwrap_or_else(PoisonError::into_inner) = sort_orders;
    }

    fn sort_orders(&self) -> Vec<QuerySortOrder> {
        self.sort_orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
