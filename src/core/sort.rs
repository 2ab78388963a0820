//! Sort orders for queries and default provider sorting
//!
//! A [`SortOrder`] pairs the thing being sorted (usually a property key) with
//! a [`SortDirection`]. Queries and default sort state carry
//! [`QuerySortOrder`], the string-keyed form.
//!
//! # Example
//! ```rust
//! use backend_provider::core::sort::{QuerySortOrder, SortDirection};
//!
//! let orders = QuerySortOrder::asc("last_name").then_desc("age").build();
//! assert_eq!(orders.len(), 2);
//! assert_eq!(orders[1].direction, SortDirection::Descending);
//!
//! // Text form: `key`, `key:asc` or `key:desc`
//! let parsed: QuerySortOrder = "created_at:desc".parse().unwrap();
//! assert_eq!(parsed, QuerySortOrder::descending("created_at"));
//! ```

use crate::core::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The reverse direction
    pub fn opposite(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Short keyword used in the text form
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Sorting information for one sorted item
///
/// Immutable value type; two orders are equal when both fields are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder<S> {
    /// What is being sorted
    pub sorted: S,

    /// Which way
    #[serde(default)]
    pub direction: SortDirection,
}

impl<S> SortOrder<S> {
    /// Create a new sort order
    pub fn new(sorted: S, direction: SortDirection) -> Self {
        Self { sorted, direction }
    }

    /// Same sorted item, reversed direction
    pub fn reversed(self) -> Self {
        Self {
            sorted: self.sorted,
            direction: self.direction.opposite(),
        }
    }
}

/// Sort order keyed by a back-end property name
pub type QuerySortOrder = SortOrder<String>;

impl SortOrder<String> {
    /// Ascending order on `key`
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key.into(), SortDirection::Ascending)
    }

    /// Descending order on `key`
    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key.into(), SortDirection::Descending)
    }

    /// Start building a sort order list with an ascending order on `key`
    pub fn asc(key: impl Into<String>) -> QuerySortOrderBuilder {
        QuerySortOrderBuilder::default().then_asc(key)
    }

    /// Start building a sort order list with a descending order on `key`
    pub fn desc(key: impl Into<String>) -> QuerySortOrderBuilder {
        QuerySortOrderBuilder::default().then_desc(key)
    }
}

impl fmt::Display for SortOrder<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sorted, self.direction.keyword())
    }
}

impl FromStr for SortOrder<String> {
    type Err = ProviderError;

    /// Parse `field`, `field:asc` or `field:desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ProviderError::InvalidSortOrder {
            value: s.to_string(),
            message: message.to_string(),
        };

        let (key, direction) = match s.rsplit_once(':') {
            Some((key, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" | "ascending" => SortDirection::Ascending,
                    "desc" | "descending" => SortDirection::Descending,
                    _ => return Err(invalid("direction must be 'asc' or 'desc'")),
                };
                (key, direction)
            }
            None => (s, SortDirection::Ascending),
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(invalid("property key is empty"));
        }

        Ok(Self::new(key.to_string(), direction))
    }
}

/// Fluent builder for a list of [`QuerySortOrder`]
#[derive(Debug, Clone, Default)]
pub struct QuerySortOrderBuilder {
    orders: Vec<QuerySortOrder>,
}

impl QuerySortOrderBuilder {
    /// Append an ascending order on `key`
    pub fn then_asc(mut self, key: impl Into<String>) -> Self {
        self.orders.push(QuerySortOrder::ascending(key));
        self
    }

    /// Append a descending order on `key`
    pub fn then_desc(mut self, key: impl Into<String>) -> Self {
        self.orders.push(QuerySortOrder::descending(key));
        self
    }

    /// Finish the list
    pub fn build(self) -> Vec<QuerySortOrder> {
        self.orders
    }
}
