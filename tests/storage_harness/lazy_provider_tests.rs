//! Macro-generated test suite for lazy providers over a `BackEnd`.
//!
//! The `lazy_provider_tests!` macro generates a test module that wraps a back
//! end in a `BackEndDataProvider` and validates the provider contract: default
//! sorting, windowing, the lazy classification, and filter wrappers.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use backend_provider::storage::InMemoryBackEnd;
//!
//! fn backend(items: Vec<TestItem>) -> InMemoryBackEnd<TestItem, String> {
//!     InMemoryBackEnd::new(items, matches_filter)
//! }
//!
//! lazy_provider_tests!(backend);
//! ```
//!
//! # Generated Tests
//!
//! ## Default sorting
//! - `test_natural_order_without_defaults`
//! - `test_defaults_order_unsorted_query`
//! - `test_clearing_defaults_restores_natural_order`
//! - `test_defaults_break_query_ties`
//! - `test_query_direction_wins_over_default`
//! - `test_set_sort_order_matches_single_element_list`
//! - `test_concurrent_default_changes_are_atomic`
//!
//! ## Provider contract
//! - `test_never_in_memory`
//! - `test_size_ignores_window`
//! - `test_pages_cover_sorted_dataset`
//!
//! ## Filter wrappers
//! - `test_configurable_filter_combines_with_query`
//! - `test_configurable_filter_without_query_filter`
//! - `test_wrapper_keeps_provider_defaults`
//! - `test_configured_filter_only`
//! - `test_independent_wrappers`
//! - `test_wrapper_refresh_reaches_provider_subscribers`

/// Generate a lazy provider conformance test suite.
///
/// `$factory` must be callable as `$factory(items: Vec<TestItem>) -> B`
/// where `B: BackEnd<Item = TestItem, Filter = String>` holds `items` in
/// natural order and interprets filters with [`matches_filter`]. It is
/// re-evaluated for each test to ensure isolation.
#[macro_export]
macro_rules! lazy_provider_tests {
    ($factory:expr) => {
        mod lazy_provider_contract_tests {
            use super::*;
            use backend_provider::core::backend::{BackEnd, BackEndDataProvider, LazyDataProvider};
            use backend_provider::core::events::DataChangeEvent;
            use backend_provider::core::provider::{drain_events, DataProvider};
            use backend_provider::core::query::Query;
            use backend_provider::core::sort::QuerySortOrder;
            use std::sync::Arc;

            fn provider()
            -> Arc<BackEndDataProvider<impl BackEnd<Item = TestItem, Filter = String>>> {
                init_tracing();
                Arc::new(BackEndDataProvider::new(($factory)(sample_items())))
            }

            const BY_AGE_ASC: [&str; 6] = ["Fay", "Bob", "Cid", "Ann", "Eve", "Dee"];
            const BY_AGE_DESC: [&str; 6] = ["Dee", "Ann", "Eve", "Bob", "Cid", "Fay"];

            // ==================================================================
            // Default sorting
            // ==================================================================

            #[tokio::test]
            async fn test_natural_order_without_defaults() {
                let provider = provider();
                assert!(provider.sort_orders().is_empty());

                let items = provider.fetch(&Query::new()).await.unwrap();
                assert_eq!(names(&items), vec!["Ann", "Bob", "Cid", "Dee", "Eve", "Fay"]);
            }

            #[tokio::test]
            async fn test_defaults_order_unsorted_query() {
                let provider = provider();
                provider.set_sort_orders(vec![QuerySortOrder::ascending("age")]);

                assert_eq!(provider.sort_orders(), vec![QuerySortOrder::ascending("age")]);

                // Bob and Cid tie on age and keep their natural order
                let items = provider.fetch(&Query::new()).await.unwrap();
                assert_eq!(names(&items), BY_AGE_ASC);
            }

            #[tokio::test]
            async fn test_clearing_defaults_restores_natural_order() {
                let provider = provider();
                let natural = names(&provider.fetch(&Query::new()).await.unwrap());

                provider.set_sort_orders(QuerySortOrder::desc("age").then_asc("name").build());
                provider.set_sort_orders(Vec::new());
                assert!(provider.sort_orders().is_empty());
                assert_eq!(names(&provider.fetch(&Query::new()).await.unwrap()), natural);

                provider.set_sort_order(Some(QuerySortOrder::descending("name")));
                provider.set_sort_order(None);
                assert!(provider.sort_orders().is_empty());
                assert_eq!(names(&provider.fetch(&Query::new()).await.unwrap()), natural);
            }

            #[tokio::test]
            async fn test_defaults_break_query_ties() {
                let provider = provider();
                provider.set_sort_order(Some(QuerySortOrder::descending("name")));

                let query = Query::new()
                    .with_sort_orders(vec![QuerySortOrder::ascending("department")]);
                let items = provider.fetch(&query).await.unwrap();

                // eng, ops, sales; names descending within each department
                assert_eq!(names(&items), vec!["Dee", "Bob", "Eve", "Fay", "Cid", "Ann"]);
            }

            #[tokio::test]
            async fn test_query_direction_wins_over_default() {
                let provider = provider();
                provider.set_sort_order(Some(QuerySortOrder::descending("age")));

                let query = Query::new().with_sort_orders(vec![QuerySortOrder::ascending("age")]);
                let items = provider.fetch(&query).await.unwrap();

                assert_eq!(names(&items), BY_AGE_ASC);
            }

            #[tokio::test]
            async fn test_set_sort_order_matches_single_element_list() {
                let single = provider();
                single.set_sort_order(Some(QuerySortOrder::descending("score")));

                let listed = provider();
                listed.set_sort_orders(vec![QuerySortOrder::descending("score")]);

                assert_eq!(single.sort_orders(), listed.sort_orders());

                let from_single = single.fetch(&Query::new()).await.unwrap();
                let from_listed = listed.fetch(&Query::new()).await.unwrap();
                assert_eq!(names(&from_single), names(&from_listed));
                assert_eq!(names(&from_single), vec!["Eve", "Bob", "Dee", "Ann", "Fay", "Cid"]);
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_default_changes_are_atomic() {
                let provider = provider();
                provider.set_sort_order(Some(QuerySortOrder::ascending("age")));

                let mut handles = Vec::new();
                for i in 0..64 {
                    let provider = provider.clone();
                    handles.push(tokio::spawn(async move {
                        if i % 2 == 0 {
                            let order = if i % 4 == 0 {
                                QuerySortOrder::descending("age")
                            } else {
                                QuerySortOrder::ascending("age")
                            };
                            provider.set_sort_order(Some(order));
                            None
                        } else {
                            Some(provider.fetch(&Query::new()).await.unwrap())
                        }
                    }));
                }

                for handle in handles {
                    if let Some(items) = handle.await.unwrap() {
                        let order = names(&items);
                        assert!(
                            order == BY_AGE_ASC || order == BY_AGE_DESC,
                            "torn order {order:?}"
                        );
                    }
                }
            }

            // ==================================================================
            // Provider contract
            // ==================================================================

            #[tokio::test]
            async fn test_never_in_memory() {
                let provider = provider();
                assert!(!provider.is_in_memory());

                provider.set_sort_order(Some(QuerySortOrder::ascending("name")));
                assert!(!provider.is_in_memory());
                assert!(!provider.with_configured_filter_only().is_in_memory());
            }

            #[tokio::test]
            async fn test_size_ignores_window() {
                let provider = provider();
                let query = Query::filtered("department=sales".to_string())
                    .with_offset(1)
                    .with_limit(1);

                assert_eq!(provider.size(&query).await.unwrap(), 3);
                assert_eq!(names(&provider.fetch(&query).await.unwrap()), vec!["Cid"]);
                assert_eq!(provider.size(&Query::new()).await.unwrap(), 6);
            }

            #[tokio::test]
            async fn test_pages_cover_sorted_dataset() {
                let provider = provider();
                provider.set_sort_order(Some(QuerySortOrder::descending("name")));

                let mut seen = Vec::new();
                for offset in (0..6).step_by(2) {
                    let page = provider
                        .fetch(&Query::new().with_offset(offset).with_limit(2))
                        .await
                        .unwrap();
                    assert_eq!(page.len(), 2);
                    seen.extend(names(&page));
                }

                assert_eq!(seen, vec!["Fay", "Eve", "Dee", "Cid", "Bob", "Ann"]);

                let past_end = provider.fetch(&Query::new().with_offset(6)).await.unwrap();
                assert!(past_end.is_empty());
            }

            // ==================================================================
            // Filter wrappers
            // ==================================================================

            #[tokio::test]
            async fn test_configurable_filter_combines_with_query() {
                let provider = provider();
                let wrapper = provider.with_configurable_filter(with_name_clause);

                let bob = wrapper.fetch(&Query::filtered("Bob".to_string())).await.unwrap();
                assert_eq!(names(&bob), vec!["Bob"]);

                wrapper.set_filter("department=sales".to_string());

                let cid = wrapper.fetch(&Query::filtered("Cid".to_string())).await.unwrap();
                assert_eq!(names(&cid), vec!["Cid"]);

                // Bob is not in sales
                let none = wrapper.fetch(&Query::filtered("Bob".to_string())).await.unwrap();
                assert!(none.is_empty());
                assert_eq!(wrapper.size(&Query::filtered("Bob".to_string())).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_configurable_filter_without_query_filter() {
                let provider = provider();
                let wrapper = provider.with_configurable_filter(with_name_clause);

                assert_eq!(wrapper.size(&Query::new()).await.unwrap(), 6);

                wrapper.set_filter("department=sales".to_string());
                let items = wrapper.fetch(&Query::new()).await.unwrap();
                assert_eq!(names(&items), vec!["Ann", "Cid", "Fay"]);
                assert_eq!(wrapper.size(&Query::new()).await.unwrap(), 3);

                wrapper.set_filter(None);
                assert_eq!(wrapper.size(&Query::new()).await.unwrap(), 6);
            }

            #[tokio::test]
            async fn test_wrapper_keeps_provider_defaults() {
                let provider = provider();
                let wrapper = provider.with_configurable_filter(with_name_clause);
                wrapper.set_filter("department=sales".to_string());

                provider.set_sort_order(Some(QuerySortOrder::descending("name")));
                let items = wrapper.fetch(&Query::new()).await.unwrap();
                assert_eq!(names(&items), vec!["Fay", "Cid", "Ann"]);

                let page = wrapper
                    .fetch(&Query::new().with_offset(1).with_limit(1))
                    .await
                    .unwrap();
                assert_eq!(names(&page), vec!["Cid"]);
            }

            #[tokio::test]
            async fn test_configured_filter_only() {
                let provider = provider();
                let wrapper = provider.with_configured_filter_only();

                assert_eq!(wrapper.fetch(&Query::new()).await.unwrap().len(), 6);

                wrapper.set_filter("department=eng".to_string());
                assert_eq!(wrapper.filter().as_deref(), Some("department=eng"));

                let items = wrapper.fetch(&Query::new()).await.unwrap();
                assert_eq!(names(&items), vec!["Bob", "Dee"]);
                assert_eq!(wrapper.size(&Query::new()).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_independent_wrappers() {
                let provider = provider();

                let sales = Arc::new(provider.with_configured_filter_only());
                sales.set_filter("department=sales".to_string());
                let eng = Arc::new(provider.with_configured_filter_only());
                eng.set_filter("department=eng".to_string());

                let sales_task = {
                    let sales = sales.clone();
                    tokio::spawn(async move { sales.fetch(&Query::new()).await })
                };
                let eng_task = {
                    let eng = eng.clone();
                    tokio::spawn(async move { eng.fetch(&Query::new()).await })
                };

                let (sales_items, eng_items) = futures::future::join(sales_task, eng_task).await;
                assert_eq!(names(&sales_items.unwrap().unwrap()), vec!["Ann", "Cid", "Fay"]);
                assert_eq!(names(&eng_items.unwrap().unwrap()), vec!["Bob", "Dee"]);

                // The wrapped provider itself stays unfiltered
                assert_eq!(provider.size(&Query::new()).await.unwrap(), 6);
            }

            #[tokio::test]
            async fn test_wrapper_refresh_reaches_provider_subscribers() {
                let provider = provider();
                let wrapper = provider.with_configurable_filter(with_name_clause);
                let mut rx = provider.subscribe();

                wrapper.refresh_all();

                let events = drain_events(&mut rx);
                assert_eq!(events.len(), 1);
                assert!(events[0].is_refresh_all());
                assert!(matches!(events[0], DataChangeEvent::RefreshAll));
            }
        }
    };
}
