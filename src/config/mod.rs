//! Configuration loading for back-end data providers
//!
//! ```yaml
//! default_sort_orders:
//!   - last_name            # ascending
//!   - "age:desc"
//!   - sorted: id
//!     direction: ascending
//! event_capacity: 128
//! ```

use crate::core::error::ProviderError;
use crate::core::events::DEFAULT_EVENT_CAPACITY;
use crate::core::sort::QuerySortOrder;
use serde::{Deserialize, Deserializer, Serialize};

/// Configuration for a back-end data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Sort orders applied when a query defines none, and as tie-breakers
    #[serde(deserialize_with = "deserialize_sort_orders")]
    pub default_sort_orders: Vec<QuerySortOrder>,

    /// Buffer size of the change-event channel
    pub event_capacity: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_sort_orders: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProviderError::ConfigIo {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str::<Self>(&content)
            .map(Self::normalized)
            .map_err(|e| ProviderError::ConfigParse {
                file: Some(path.to_string()),
                message: e.to_string(),
            })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProviderError> {
        serde_yaml::from_str::<Self>(yaml)
            .map(Self::normalized)
            .map_err(|e| ProviderError::ConfigParse {
                file: None,
                message: e.to_string(),
            })
    }

    fn normalized(mut self) -> Self {
        self.event_capacity = self.event_capacity.max(1);
        self
    }
}

/// A sort order written either as `"key:dir"` text or as a map
#[derive(Deserialize)]
#[serde(untagged)]
enum SortOrderEntry {
    Text(String),
    Structured(QuerySortOrder),
}

fn deserialize_sort_orders<'de, D>(deserializer: D) -> Result<Vec<QuerySortOrder>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<SortOrderEntry>::deserialize(deserializer)?
        .into_iter()
        .map(|entry| match entry {
            SortOrderEntry::Text(text) => text.parse().map_err(serde::de::Error::custom),
            SortOrderEntry::Structured(order) => Ok(order),
        })
        .collect()
}
