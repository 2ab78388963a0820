//! In-memory implementation of BackEnd for testing and development
//!
//! The items live in a `Vec`, but they are still served through
//! [`BackEndDataProvider`](crate::core::backend::BackEndDataProvider), so the
//! provider behaves exactly as it would in front of a remote store.

use crate::core::backend::BackEnd;
use crate::core::field::{FieldValue, Properties};
use crate::core::query::Query;
use crate::core::sort::{QuerySortOrder, SortDirection};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// Decides whether an item matches a filter
pub type FilterPredicate<T, F> = Arc<dyn Fn(&T, &F) -> bool + Send + Sync>;

/// In-memory back end
///
/// Filters with a predicate, sorts by item properties, then applies offset
/// and limit. Uses RwLock for thread-safe access.
pub struct InMemoryBackEnd<T, F> {
    items: Arc<RwLock<Vec<T>>>,
    predicate: FilterPredicate<T, F>,
}

impl<T, F> Clone for InMemoryBackEnd<T, F> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<T, F> InMemoryBackEnd<T, F>
where
    T: Properties + Clone + Send + Sync + 'static,
    F: Clone + Send + Sync + 'static,
{
    /// Create a back end over `items`, matching filters with `predicate`
    pub fn new(
        items: Vec<T>,
        predicate: impl Fn(&T, &F) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
            predicate: Arc::new(predicate),
        }
    }

    /// Create a back end whose filters match every item
    pub fn unfiltered(items: Vec<T>) -> Self {
        Self::new(items, |_, _| true)
    }

    /// Add an item at the end of the natural order
    pub fn push(&self, item: T) -> Result<()> {
        self.items
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .push(item);
        Ok(())
    }

    /// Number of stored items, ignoring any filter
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    fn matching(&self, filter: Option<&F>) -> Result<Vec<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(match filter {
            Some(filter) => items
                .iter()
                .filter(|&item| (self.predicate)(item, filter))
                .cloned()
                .collect(),
            None => items.clone(),
        })
    }
}

/// Compare two items by a sequence of sort orders, most significant first
pub fn compare_by_sort_orders<T: Properties>(
    a: &T,
    b: &T,
    sort_orders: &[QuerySortOrder],
) -> Ordering {
    sort_orders
        .iter()
        .map(|order| {
            let left = a.property(&order.sorted).unwrap_or(FieldValue::Null);
            let right = b.property(&order.sorted).unwrap_or(FieldValue::Null);
            let ordering = left.compare(&right);
            match order.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl<T, F> BackEnd for InMemoryBackEnd<T, F>
where
    T: Properties + Clone + Send + Sync + 'static,
    F: Clone + Send + Sync + 'static,
{
    type Item = T;
    type Filter = F;

    async fn fetch_from_back_end(&self, query: &Query<T, F>) -> Result<Vec<T>> {
        let mut items = self.matching(query.filter())?;

        if !query.sort_orders().is_empty() {
            // Stable: items equal under every order keep their natural order
            items.sort_by(|a, b| compare_by_sort_orders(a, b, query.sort_orders()));
        }

        Ok(items
            .into_iter()
            .skip(query.offset())
            .take(query.limit())
            .collect())
    }

    async fn size_in_back_end(&self, query: &Query<T, F>) -> Result<usize> {
        Ok(self.matching(query.filter())?.len())
    }
}
