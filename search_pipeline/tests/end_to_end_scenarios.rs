// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end scenarios against in-memory `IndexSource`/`AuthorizerClient`
//! fakes, run through the full `PipelineDriver`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;

use search_pipeline::application::services::{PipelineDriver, PipelineDriverConfig};
use search_pipeline::infrastructure::PipelineMetrics;
use search_pipeline_domain::error::SearchError;
use search_pipeline_domain::services::index_source::{IndexHandle, Page};
use search_pipeline_domain::value_objects::{AuthorizationResult, Event, QueryMode, SearchRequest};
use search_pipeline_domain::{AuthorizerClient, IndexSource};

fn event(id: u64) -> Event {
    Event::new(id, Utc::now(), format!("event-{id}"), "body".to_string())
}

/// Index Source fake backed by a full in-order id list, paginated by a
/// fixed page size.
struct InMemoryIndex {
    ids: Vec<u64>,
    page_size: usize,
}

#[async_trait]
impl IndexSource for InMemoryIndex {
    async fn open(&self, query: &str, mode: QueryMode) -> Result<IndexHandle, SearchError> {
        Ok(IndexHandle::new(query, mode, self.page_size as u32))
    }

    async fn next_page(&self, handle: &mut IndexHandle) -> Result<Page, SearchError> {
        let offset = handle
            .cursor
            .continuation_token
            .as_ref()
            .and_then(|token| token.as_u64())
            .unwrap_or(0) as usize;
        let end = (offset + self.page_size).min(self.ids.len());
        let page_ids = self.ids[offset..end].to_vec();
        let more = end < self.ids.len();
        handle.cursor.advance(more.then(|| serde_json::Value::from(end as u64)));
        Ok(Page { events: page_ids.into_iter().map(event).collect(), more })
    }

    async fn close(&self, _handle: IndexHandle) {}

    async fn fetch_by_ids(&self, ids: &[u64]) -> Result<Vec<Event>, SearchError> {
        let present: HashSet<u64> = self.ids.iter().copied().collect();
        Ok(ids.iter().copied().filter(|id| present.contains(id)).map(event).collect())
    }
}

/// Authorizer fake that counts `check_batch` invocations and authorizes
/// exactly the ids in `allowed`.
struct CountingAuthorizer {
    allowed: HashSet<u64>,
    check_batch_calls: AtomicUsize,
}

impl CountingAuthorizer {
    fn new(allowed: HashSet<u64>) -> Self {
        Self { allowed, check_batch_calls: AtomicUsize::new(0) }
    }

    fn check_batch_call_count(&self) -> usize {
        self.check_batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizerClient for CountingAuthorizer {
    async fn check_batch(&self, event_ids: &[u64], _user_id: &str, _deadline: Duration) -> AuthorizationResult {
        self.check_batch_calls.fetch_add(1, Ordering::SeqCst);
        AuthorizationResult::new(event_ids.iter().copied().filter(|id| self.allowed.contains(id)).collect())
    }

    async fn enumerate_for_user(&self, _user_id: &str, _deadline: Duration) -> Vec<u64> {
        let mut ids: Vec<u64> = self.allowed.iter().copied().collect();
        ids.sort();
        ids
    }
}

fn driver(index_ids: Vec<u64>, page_size: usize, authorizer: Arc<CountingAuthorizer>, batch_size: usize) -> PipelineDriver {
    let index_source: Arc<dyn IndexSource> = Arc::new(InMemoryIndex { ids: index_ids, page_size });
    PipelineDriver::new(
        index_source,
        authorizer,
        PipelineDriverConfig {
            concurrency: 4,
            batch_size,
            batch_delay: Duration::from_secs(5),
            default_limit: 100,
            auth_deadline: Duration::from_secs(1),
            index_page_size: page_size as u32,
        },
        Arc::new(PipelineMetrics::new().unwrap()),
    )
}

#[tokio::test]
async fn fully_authorized_below_limit() {
    let ids: Vec<u64> = (1..=100).collect();
    let authorizer = Arc::new(CountingAuthorizer::new(ids.iter().copied().collect()));
    let driver = driver(ids.clone(), 20, authorizer.clone(), 10);
    let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();

    let results: Vec<u64> = driver.search(request).map(|r| r.unwrap().id).collect().await;

    assert_eq!(results, ids);
    assert!(authorizer.check_batch_call_count() as u64 >= (100u64).div_ceil(10));
}

#[tokio::test]
async fn fully_authorized_above_limit() {
    let ids: Vec<u64> = (1..=300).collect();
    let authorizer = Arc::new(CountingAuthorizer::new(ids.iter().copied().collect()));
    let driver = driver(ids, 25, authorizer, 10);
    let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();

    let results: Vec<u64> = driver.search(request).map(|r| r.unwrap().id).collect().await;

    assert_eq!(results.len(), 200);
    assert_eq!(results, (1..=200).collect::<Vec<_>>());
}

#[tokio::test]
async fn sparse_authorization_exactly_meeting_count() {
    let ids: Vec<u64> = (1..=1000).collect();
    let authorized: HashSet<u64> = ids.iter().copied().step_by(20).take(50).collect();
    assert_eq!(authorized.len(), 50);
    let authorizer = Arc::new(CountingAuthorizer::new(authorized.clone()));
    let driver = driver(ids, 50, authorizer.clone(), 20);
    let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();

    let results: Vec<u64> = driver.search(request).map(|r| r.unwrap().id).collect().await;

    assert_eq!(results.len(), 50);
    assert!(results.iter().all(|id| authorized.contains(id)));
    assert!(authorizer.check_batch_call_count() >= 2);
}

#[tokio::test]
async fn very_sparse_authorization_no_under_reporting() {
    let ids: Vec<u64> = (1..=5000).collect();
    let authorized: HashSet<u64> = ids.iter().copied().step_by(33).take(150).collect();
    assert_eq!(authorized.len(), 150);
    let authorizer = Arc::new(CountingAuthorizer::new(authorized.clone()));
    let driver = driver(ids, 50, authorizer, 20);
    let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();

    let results: Vec<u64> = driver.search(request).map(|r| r.unwrap().id).collect().await;

    assert_eq!(results.len(), 150);
    assert!(results.iter().all(|id| authorized.contains(id)));
}

#[tokio::test]
async fn zero_authorized_terminates_cleanly() {
    let ids: Vec<u64> = (1..=100).collect();
    let authorizer = Arc::new(CountingAuthorizer::new(HashSet::new()));
    let driver = driver(ids, 20, authorizer, 10);
    let request = SearchRequest::new("event", "user-1", Some(200)).unwrap();

    let results: Vec<u64> = driver.search(request).map(|r| r.unwrap().id).collect().await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn query_less_fast_path_skips_batch_checks() {
    let authorized: HashSet<u64> = (1..=40).collect();
    let authorizer = Arc::new(CountingAuthorizer::new(authorized.clone()));
    let driver = driver(authorized.iter().copied().collect(), 20, authorizer.clone(), 10);
    let request = SearchRequest::new("", "user-1", Some(15)).unwrap();

    let results: Vec<u64> = driver.search(request).map(|r| r.unwrap().id).collect().await;

    assert_eq!(results.len(), 15);
    assert!(results.iter().all(|id| authorized.contains(id)));
    assert_eq!(authorizer.check_batch_call_count(), 0);
}
