//! # backend-provider
//!
//! Lazy data providers for large, externally stored item collections.
//!
//! ## Features
//!
//! - **Lazy Back Ends**: Items are never materialized; every query is answered by a [`BackEnd`](core::BackEnd)
//! - **Default Sorting**: Provider-level sort orders apply when a query has none and break ties otherwise
//! - **Configurable Filters**: Wrap a provider to combine a programmatic filter with each query's filter
//! - **Typed Filters**: Item, query filter, configured filter and back-end filter types stay independent
//! - **Change Events**: Subscribers are told when items need to be re-queried
//! - **Configuration-Based**: Default sort orders via YAML configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use backend_provider::prelude::*;
//!
//! let backend = InMemoryBackEnd::new(people, |person: &Person, name: &String| {
//!     person.name.contains(name.as_str())
//! });
//! let provider = Arc::new(BackEndDataProvider::new(backend));
//! provider.set_sort_order(Some(QuerySortOrder::ascending("name")));
//!
//! // Configured department combined with the name typed into a search box
//! let search = provider.with_configurable_filter(
//!     |department: Option<&String>, name: &String| match department {
//!         Some(department) => format!("{department}/{name}"),
//!         None => name.clone(),
//!     },
//! );
//! search.set_filter("sales".to_string());
//!
//! let page = search
//!     .fetch(&Query::filtered("ann".to_string()).with_limit(50))
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        backend::{BackEnd, BackEndDataProvider, LazyDataProvider},
        field::{FieldValue, Properties},
        filter::{ConfigurableFilterProvider, FilterCombiner},
        provider::DataProvider,
    };

    // === Queries ===
    pub use crate::core::{
        query::Query,
        sort::{QuerySortOrder, SortDirection, SortOrder},
    };

    // === Events ===
    pub use crate::core::events::{DataChangeEvent, DataEventBus, EventEnvelope};

    // === Errors ===
    pub use crate::core::error::ProviderError;

    // === Storage ===
    pub use crate::storage::InMemoryBackEnd;

    // === Config ===
    pub use crate::config::ProviderConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
