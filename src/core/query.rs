//! Queries issued against data providers
//!
//! A [`Query`] describes one request: which window of items (`offset` and
//! `limit`), in which order, and under which filter. Queries are treated as
//! immutable input. Anything that needs a different filter derives a new
//! query with [`Query::derive_with_filter`] instead of editing one in place.
//!
//! # Example
//! ```rust
//! use backend_provider::core::query::Query;
//! use backend_provider::core::sort::QuerySortOrder;
//!
//! let query: Query<String, String> = Query::new()
//!     .with_offset(40)
//!     .with_limit(20)
//!     .with_sort_orders(QuerySortOrder::desc("created_at").build())
//!     .with_filter("status=active".to_string());
//!
//! let derived = query.derive_with_filter(Some(42u32));
//! assert_eq!(derived.offset(), 40);
//! assert_eq!(derived.filter(), Some(&42));
//! ```

use crate::core::sort::QuerySortOrder;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Comparator an in-memory provider may use to sort items itself
pub type InMemorySorting<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// A request for a window of items, with sorting and an optional filter
///
/// - `T`: item type
/// - `F`: filter type; `None` means "no filter", never a sentinel value
pub struct Query<T, F> {
    offset: usize,
    limit: usize,
    sort_orders: Vec<QuerySortOrder>,
    in_memory_sorting: Option<InMemorySorting<T>>,
    filter: Option<F>,
}

impl<T, F> Query<T, F> {
    /// Query for all items: offset 0, no limit, no sorting, no filter
    pub fn new() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
            sort_orders: Vec::new(),
            in_memory_sorting: None,
            filter: None,
        }
    }

    /// Query for all items matching `filter`
    pub fn filtered(filter: F) -> Self {
        Self::new().with_filter(filter)
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort_orders(mut self, sort_orders: Vec<QuerySortOrder>) -> Self {
        self.sort_orders = sort_orders;
        self
    }

    pub fn with_in_memory_sorting(mut self, sorting: InMemorySorting<T>) -> Self {
        self.in_memory_sorting = Some(sorting);
        self
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Index of the first requested item
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of items to return (`usize::MAX` when unbounded)
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Sort orders requested by the caller, most significant first
    pub fn sort_orders(&self) -> &[QuerySortOrder] {
        &self.sort_orders
    }

    pub fn in_memory_sorting(&self) -> Option<&InMemorySorting<T>> {
        self.in_memory_sorting.as_ref()
    }

    /// The filter, if the query carries one
    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Index one past the last requested item, saturating at `usize::MAX`
    pub fn requested_range_end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    /// New query identical to this one except for its filter
    ///
    /// The filter type may change: this is how a wrapper turns a query in its
    /// own filter type into one the wrapped provider understands.
    pub fn derive_with_filter<G>(&self, filter: Option<G>) -> Query<T, G> {
        Query {
            offset: self.offset,
            limit: self.limit,
            sort_orders: self.sort_orders.clone(),
            in_memory_sorting: self.in_memory_sorting.clone(),
            filter,
        }
    }

    /// New query identical to this one except for its sort orders
    pub fn derive_with_sort_orders(&self, sort_orders: Vec<QuerySortOrder>) -> Self
    where
        F: Clone,
    {
        Query {
            sort_orders,
            ..self.clone()
        }
    }
}

impl<T, F> Default for Query<T, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F: Clone> Clone for Query<T, F> {
    fn clone(&self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit,
            sort_orders: self.sort_orders.clone(),
            in_memory_sorting: self.in_memory_sorting.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<T, F: fmt::Debug> fmt::Debug for Query<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("sort_orders", &self.sort_orders)
            .field("in_memory_sorting", &self.in_memory_sorting.is_some())
            .field("filter", &self.filter)
            .finish()
    }
}

/// Comparators are equal only when they are the same allocation
impl<T, F: PartialEq> PartialEq for Query<T, F> {
    fn eq(&self, other: &Self) -> bool {
        let same_sorting = match (&self.in_memory_sorting, &other.in_memory_sorting) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        self.offset == other.offset
            && self.limit == other.limit
            && self.sort_orders == other.sort_orders
            && same_sorting
            && self.filter == other.filter
    }
}
