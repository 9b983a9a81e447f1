//! Macro-generated test suite for `DataService<T>` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates a
//! backend against the full contract: single-document operations, ordering,
//! paging, date-range filtering on dated and undated content, and
//! concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use pulpit::storage::InMemoryDataService;
//!
//! data_service_tests!(
//!     InMemoryDataService::<Sermon>::new(),
//!     InMemoryDataService::<GalleryImage>::new()
//! );
//! ```

/// Generate a full `DataService` conformance test suite.
///
/// `$sermons` must evaluate to a `DataService<Sermon>`, `$gallery` to a
/// `DataService<GalleryImage>`. Both are re-evaluated for each test to
/// ensure isolation. For the concurrent access test, the sermon service
/// must also implement `Clone + 'static`.
#[macro_export]
macro_rules! data_service_tests {
    ($sermons:expr, $gallery:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use pulpit::core::query::{DateRange, FindQuery, Pagination};
            use pulpit::core::service::DataService;
            use uuid::Uuid;

            // ==================================================================
            // Single-document operations
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_find_by_id() {
                let service = $sermons;
                let document = stamped(sermon("Grace", at(2024, 1, 7, 0, 0)), 0);

                let inserted = service.insert(document.clone()).await.unwrap();
                assert_eq!(inserted, document);

                let found = service.find_by_id(&document.id).await.unwrap().unwrap();
                assert_eq!(found, document);
            }

            #[tokio::test]
            async fn test_find_by_id_missing() {
                let service = $sermons;
                assert!(service.find_by_id(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_update_replaces_content() {
                let service = $sermons;
                let document = stamped(sermon("Old", at(2024, 1, 7, 0, 0)), 0);
                service.insert(document.clone()).await.unwrap();

                let mut content = sermon("New", at(2024, 2, 4, 0, 0));
                content.video_url = None;
                content.duration_minutes = None;

                let updated = service
                    .update_by_id(&document.id, content.clone())
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(updated.id, document.id);
                assert_eq!(updated.content, content);
                assert_eq!(updated.created_at, document.created_at);
                assert!(updated.updated_at > document.updated_at);

                let found = service.find_by_id(&document.id).await.unwrap().unwrap();
                assert_eq!(found.content, content);
                assert_eq!(found.content.video_url, None);
            }

            #[tokio::test]
            async fn test_update_missing_returns_none() {
                let service = $sermons;
                let result = service
                    .update_by_id(&Uuid::new_v4(), sermon("Ghost", at(2024, 1, 7, 0, 0)))
                    .await
                    .unwrap();
                assert!(result.is_none());
            }

            #[tokio::test]
            async fn test_delete() {
                let service = $sermons;
                let document = stamped(sermon("Gone", at(2024, 1, 7, 0, 0)), 0);
                service.insert(document.clone()).await.unwrap();

                assert!(service.delete_by_id(&document.id).await.unwrap());
                assert!(service.find_by_id(&document.id).await.unwrap().is_none());
                assert!(!service.delete_by_id(&document.id).await.unwrap());
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_find_many_empty() {
                let service = $sermons;
                let all = service.find_many(&FindQuery::default()).await.unwrap();
                assert!(all.is_empty());
                assert_eq!(service.count(&DateRange::default()).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_find_many_newest_created_first() {
                let service = $sermons;
                // Semantic dates run opposite to creation order
                let docs = vec![
                    stamped(sermon("first", at(2024, 3, 1, 0, 0)), 0),
                    stamped(sermon("second", at(2024, 2, 1, 0, 0)), 1),
                    stamped(sermon("third", at(2024, 1, 1, 0, 0)), 2),
                ];
                for doc in docs {
                    service.insert(doc).await.unwrap();
                }

                let all = service.find_many(&FindQuery::default()).await.unwrap();
                assert_eq!(titles(&all), vec!["third", "second", "first"]);
            }

            #[tokio::test]
            async fn test_pages_concatenate_to_full_list() {
                let service = $sermons;
                for doc in sermon_batch(7) {
                    service.insert(doc).await.unwrap();
                }

                let full = service.find_many(&FindQuery::default()).await.unwrap();
                let mut concatenated = Vec::new();
                for page in 1..=3 {
                    let query = FindQuery::page(DateRange::default(), Pagination { page, limit: 3 });
                    concatenated.extend(service.find_many(&query).await.unwrap());
                }

                assert_eq!(titles(&concatenated), titles(&full));
                assert_eq!(service.count(&DateRange::default()).await.unwrap(), 7);

                let past_end = FindQuery::page(DateRange::default(), Pagination { page: 4, limit: 3 });
                assert!(service.find_many(&past_end).await.unwrap().is_empty());
            }

            // ==================================================================
            // Date ranges
            // ==================================================================

            #[tokio::test]
            async fn test_range_bounds_are_inclusive() {
                let service = $sermons;
                let docs = vec![
                    stamped(sermon("before", at(2024, 3, 3, 23, 59)), 0),
                    stamped(sermon("monday", at(2024, 3, 4, 0, 0)), 1),
                    stamped(sermon("sunday night", at(2024, 3, 10, 23, 0)), 2),
                    stamped(sermon("after", at(2024, 3, 11, 0, 0)), 3),
                ];
                for doc in docs {
                    service.insert(doc).await.unwrap();
                }

                let range = DateRange {
                    from: Some(pulpit::core::dates::start_of_day(day(2024, 3, 4))),
                    to: Some(pulpit::core::dates::end_of_day(day(2024, 3, 10))),
                };

                let found = service.find_many(&FindQuery::all(range)).await.unwrap();
                assert_eq!(titles(&found), vec!["sunday night", "monday"]);
                assert_eq!(service.count(&range).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_open_ended_range() {
                let service = $sermons;
                service
                    .insert(stamped(sermon("old", at(2023, 6, 1, 0, 0)), 0))
                    .await
                    .unwrap();
                service
                    .insert(stamped(sermon("new", at(2024, 6, 1, 0, 0)), 1))
                    .await
                    .unwrap();

                let range = DateRange {
                    from: Some(at(2024, 1, 1, 0, 0)),
                    to: None,
                };
                let found = service.find_many(&FindQuery::all(range)).await.unwrap();
                assert_eq!(titles(&found), vec!["new"]);
            }

            #[tokio::test]
            async fn test_undated_content_never_matches_a_range() {
                let service = $gallery;
                service
                    .insert(stamped(image("/uploads/a.jpg"), 0))
                    .await
                    .unwrap();
                service
                    .insert(stamped(image("/uploads/b.jpg"), 1))
                    .await
                    .unwrap();

                let range = DateRange {
                    from: Some(at(2000, 1, 1, 0, 0)),
                    to: None,
                };
                assert!(service.find_many(&FindQuery::all(range)).await.unwrap().is_empty());
                assert_eq!(service.count(&range).await.unwrap(), 0);

                let all = service.find_many(&FindQuery::default()).await.unwrap();
                let urls: Vec<&str> = all.iter().map(|d| d.content.url.as_str()).collect();
                assert_eq!(urls, vec!["/uploads/b.jpg", "/uploads/a.jpg"]);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let service = $sermons;
                let mut handles = Vec::new();

                for doc in sermon_batch(10) {
                    let service = service.clone();
                    handles.push(tokio::spawn(async move { service.insert(doc).await }));
                }
                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                assert_eq!(service.count(&DateRange::default()).await.unwrap(), 10);
            }
        }
    };
}
