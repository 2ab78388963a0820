//! Core module containing the provider contracts and query types

pub mod backend;
pub mod error;
pub mod events;
pub mod field;
pub mod filter;
pub mod provider;
pub mod query;
pub mod sort;

pub use backend::{BackEnd, BackEndDataProvider, LazyDataProvider};
pub use error::ProviderError;
pub use events::{DataChangeEvent, DataEventBus, EventEnvelope};
pub use field::{FieldValue, Properties};
pub use filter::{ConfigurableFilterProvider, FilterCombiner};
pub use provider::DataProvider;
pub use query::Query;
pub use sort::{QuerySortOrder, SortDirection, SortOrder};
