// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Driver
//!
//! Composes the Index Source, Authorizer Client, Batcher, and Ordered
//! Concurrent Filter into a single `search(request) -> lazy sequence of
//! Event` operation. Owns the global result ceiling, the query-less fast
//! path, and quoted-phrase detection.

use std::sync::Arc;
use std::time::Duration;

use async_stream::try_stream;
use futures::Stream;

use search_pipeline_domain::error::SearchError;
use search_pipeline_domain::value_objects::{PipelineCursor, QueryMode, SearchRequest};
use search_pipeline_domain::{AuthorizerClient, IndexSource};

use crate::application::services::batcher::{Batcher, BatcherConfig};
use crate::application::services::ordered_filter::{OrderedFilter, OrderedFilterConfig};
use crate::infrastructure::metrics::PipelineMetrics;

/// Tunables the driver needs beyond what a single `SearchRequest` carries.
/// Mirrors the configuration surface documented for the core.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDriverConfig {
    pub concurrency: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub default_limit: u32,
    pub auth_deadline: Duration,
    pub index_page_size: u32,
}

/// Binds the pipeline's collaborators and exposes the single `search` entry
/// point.
pub struct PipelineDriver {
    index_source: Arc<dyn IndexSource>,
    authorizer: Arc<dyn AuthorizerClient>,
    config: PipelineDriverConfig,
    metrics: Arc<PipelineMetrics>,
}

impl PipelineDriver {
    pub fn new(
        index_source: Arc<dyn IndexSource>,
        authorizer: Arc<dyn AuthorizerClient>,
        config: PipelineDriverConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self { index_source, authorizer, config, metrics }
    }

    /// Runs one search and returns a lazy, cancellable sequence of events.
    /// Dropping the stream before it is exhausted abandons all in-flight
    /// authorization calls.
    pub fn search(&self, request: SearchRequest) -> impl Stream<Item = Result<search_pipeline_domain::value_objects::Event, SearchError>> + '_ {
        try_stream! {
            let limit = request.effective_limit(self.config.default_limit);
            let mut cursor = PipelineCursor::new();

            if request.is_query_less() {
                for event in self.query_less_fetch(&request.user_id, limit).await? {
                    if cursor.has_reached(limit) {
                        break;
                    }
                    cursor.record_emission();
                    self.metrics.record_events_emitted(1);
                    yield event;
                }
                return;
            }

            let mode = QueryMode::classify(&request.query);
            let query = QueryMode::strip_quotes(&request.query);
            let handle = self.index_source.open(query, mode).await?;
            let batcher = Batcher::new(
                Arc::clone(&self.index_source),
                handle,
                BatcherConfig { max_size: self.config.batch_size, max_delay: self.config.batch_delay },
            );
            let mut filter = OrderedFilter::new(
                batcher,
                Arc::clone(&self.authorizer),
                request.user_id.clone(),
                OrderedFilterConfig { concurrency: self.config.concurrency, auth_deadline: self.config.auth_deadline },
                Arc::clone(&self.metrics),
            );

            loop {
                if cursor.has_reached(limit) {
                    cursor.cancel();
                    filter.cancel().await;
                    break;
                }
                match filter.next().await? {
                    Some(event) => {
                        cursor.record_emission();
                        self.metrics.record_events_emitted(1);
                        yield event;
                    }
                    None => {
                        cursor.mark_source_exhausted();
                        break;
                    }
                }
            }
        }
    }

    /// The query-less fast path: enumerate the user's full allowed set,
    /// then resolve it to events in a single bulk lookup. No per-batch
    /// authorization call is issued; enumeration is already authoritative.
    async fn query_less_fetch(&self, user_id: &str, limit: u32) -> Result<Vec<search_pipeline_domain::value_objects::Event>, SearchError> {
        let allowed_ids = self.authorizer.enumerate_for_user(user_id, self.config.auth_deadline).await;
        let capped: Vec<u64> = allowed_ids.into_iter().take(limit as usize).collect();
        if capped.is_empty() {
            return Ok(Vec::new());
        }
        self.index_source.fetch_by_ids(&capped).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use futures::StreamExt;
    use search_pipeline_domain::services::index_source::{IndexHandle, Page};
    use search_pipeline_domain::value_objects::{AuthorizationResult, Event};
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    fn event(id: u64) -> Event {
        Event::new(id, Utc::now(), "t", "d")
    }

    struct FixedPageSource {
        pages: Mutex<VecDeque<Vec<u64>>>,
        by_id: Vec<u64>,
    }

    #[async_trait]
    impl IndexSource for FixedPageSource {
        async fn open(&self, query: &str, mode: QueryMode) -> Result<IndexHandle, SearchError> {
            Ok(IndexHandle::new(query, mode, 10))
        }

        async fn next_page(&self, _handle: &mut IndexHandle) -> Result<Page, SearchError> {
            let mut pages = self.pages.lock().unwrap();
            match pages.pop_front() {
                Some(ids) => Ok(Page {
                    events: ids.into_iter().map(event).collect(),
                    more: !pages.is_empty(),
                }),
                None => Ok(Page { events: vec![], more: false }),
            }
        }

        async fn close(&self, _handle: IndexHandle) {}

        async fn fetch_by_ids(&self, ids: &[u64]) -> Result<Vec<Event>, SearchError> {
            Ok(ids.iter().filter(|id| self.by_id.contains(id)).map(|id| event(*id)).collect())
        }
    }

    struct AllowSetAuthorizer {
        allowed: HashSet<u64>,
    }

    #[async_trait]
    impl AuthorizerClient for AllowSetAuthorizer {
        async fn check_batch(&self, event_ids: &[u64], _user_id: &str, _deadline: Duration) -> AuthorizationResult {
            AuthorizationResult::new(event_ids.iter().copied().filter(|id| self.allowed.contains(id)).collect())
        }

        async fn enumerate_for_user(&self, _user_id: &str, _deadline: Duration) -> Vec<u64> {
            let mut ids: Vec<u64> = self.allowed.iter().copied().collect();
            ids.sort();
            ids
        }
    }

    fn driver(pages: Vec<Vec<u64>>, allowed: HashSet<u64>, limit_default: u32) -> PipelineDriver {
        let by_id: Vec<u64> = allowed.iter().copied().collect();
        let index_source: Arc<dyn IndexSource> = Arc::new(FixedPageSource { pages: Mutex::new(pages.into()), by_id });
        let authorizer: Arc<dyn AuthorizerClient> = Arc::new(AllowSetAuthorizer { allowed });
        PipelineDriver::new(
            index_source,
            authorizer,
            PipelineDriverConfig {
                concurrency: 4,
                batch_size: 20,
                batch_delay: Duration::from_secs(5),
                default_limit: limit_default,
                auth_deadline: Duration::from_secs(1),
                index_page_size: 50,
            },
            Arc::new(PipelineMetrics::new().unwrap()),
        )
    }

    #[tokio::test]
    async fn fully_authorized_below_limit_emits_everything() {
        let allowed: HashSet<u64> = (1..=100).collect();
        let pages: Vec<Vec<u64>> = (1..=100).collect::<Vec<_>>().chunks(20).map(|c| c.to_vec()).collect();
        let driver = driver(pages, allowed, 200);
        let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();
        let results: Vec<_> = driver.search(request).collect().await;
        assert_eq!(results.len(), 100);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[tokio::test]
    async fn fully_authorized_above_limit_stops_at_limit() {
        let allowed: HashSet<u64> = (1..=300).collect();
        let pages: Vec<Vec<u64>> = (1..=300).collect::<Vec<_>>().chunks(20).map(|c| c.to_vec()).collect();
        let driver = driver(pages, allowed, 200);
        let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();
        let results: Vec<_> = driver.search(request).collect().await;
        assert_eq!(results.len(), 200);
    }

    #[tokio::test]
    async fn zero_authorized_emits_nothing() {
        let pages: Vec<Vec<u64>> = (1..=100).collect::<Vec<_>>().chunks(20).map(|c| c.to_vec()).collect();
        let driver = driver(pages, HashSet::new(), 200);
        let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();
        let results: Vec<_> = driver.search(request).collect().await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn query_less_fast_path_uses_enumeration_and_bulk_lookup() {
        let allowed: HashSet<u64> = (1..=40).collect();
        let driver = driver(vec![], allowed, 200);
        let request = SearchRequest::new("", "user-1", Some(15)).unwrap();
        let results: Vec<_> = driver.search(request).collect().await;
        assert_eq!(results.len(), 15);
    }

    #[tokio::test]
    async fn quoted_query_is_treated_as_exact_phrase_and_still_searches() {
        let allowed: HashSet<u64> = (1..=5).collect();
        let pages = vec![vec![1, 2, 3, 4, 5]];
        let driver = driver(pages, allowed, 200);
        let request = SearchRequest::new("\"exact phrase\"", "user-1", Some(200)).unwrap();
        let results: Vec<_> = driver.search(request).collect().await;
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn search_records_events_emitted_for_both_paths() {
        let allowed: HashSet<u64> = (1..=5).collect();
        let pages = vec![vec![1, 2, 3, 4, 5]];
        let by_id: Vec<u64> = allowed.iter().copied().collect();
        let index_source: Arc<dyn IndexSource> = Arc::new(FixedPageSource { pages: Mutex::new(pages.into()), by_id });
        let authorizer: Arc<dyn AuthorizerClient> = Arc::new(AllowSetAuthorizer { allowed });
        let metrics = Arc::new(PipelineMetrics::new().unwrap());
        let driver = PipelineDriver::new(
            index_source,
            authorizer,
            PipelineDriverConfig {
                concurrency: 4,
                batch_size: 20,
                batch_delay: Duration::from_secs(5),
                default_limit: 200,
                auth_deadline: Duration::from_secs(1),
                index_page_size: 50,
            },
            Arc::clone(&metrics),
        );

        let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();
        let results: Vec<_> = driver.search(request).collect().await;
        assert_eq!(results.len(), 5);

        let families = metrics.registry().gather();
        let events_emitted = families
            .iter()
            .find(|f| f.get_name() == "search_pipeline_events_emitted_total")
            .map(|f| f.get_metric()[0].get_counter().get_value() as u64)
            .unwrap();
        assert_eq!(events_emitted, 5);
    }
}
