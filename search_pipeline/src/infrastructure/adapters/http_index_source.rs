// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HTTP Index Source
//!
//! `reqwest`-backed implementation of the `IndexSource` port. Pagination
//! uses an opaque continuation token that is round-tripped as-is; this
//! client never interprets it, whether the index uses a sort-key-plus-id
//! cursor or a search-after token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use search_pipeline_domain::error::SearchError;
use search_pipeline_domain::services::index_source::{IndexHandle, Page};
use search_pipeline_domain::value_objects::{Event, QueryMode};
use search_pipeline_domain::IndexSource;

#[derive(Debug, Serialize)]
struct OpenRequestBody<'a> {
    query: &'a str,
    exact_phrase: bool,
    page_size: u32,
}

#[derive(Debug, Serialize)]
struct PageRequestBody<'a> {
    query: &'a str,
    exact_phrase: bool,
    page_size: u32,
    continuation_token: &'a Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PageResponseBody {
    events: Vec<Event>,
    continuation_token: Option<serde_json::Value>,
    more: bool,
}

#[derive(Debug, Deserialize)]
struct FetchByIdsResponseBody {
    events: Vec<Event>,
}

/// Wraps a pooled `reqwest::Client` pointed at the full-text index's query
/// endpoint.
pub struct HttpIndexSource {
    client: reqwest::Client,
    base_url: Url,
    page_size: u32,
}

impl HttpIndexSource {
    pub fn new(client: reqwest::Client, base_url: Url, page_size: u32) -> Self {
        Self { client, base_url, page_size }
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.base_url
            .join(path)
            .map_err(|err| SearchError::InvalidConfiguration(format!("invalid index endpoint {path}: {err}")))
    }

    async fn send_page_request(&self, url: Url, body: &PageRequestBody<'_>) -> Result<PageResponseBody, SearchError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| SearchError::IndexTransient(err.to_string()))?;

        if response.status().is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SearchError::IndexMalformed(detail));
        }
        if !response.status().is_success() {
            return Err(SearchError::IndexTransient(format!("index returned status {}", response.status())));
        }

        response.json::<PageResponseBody>().await.map_err(|err| SearchError::IndexTransient(err.to_string()))
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    async fn open(&self, query: &str, mode: QueryMode) -> Result<IndexHandle, SearchError> {
        let page_size = self.page_size;
        let url = self.endpoint("search/open")?;
        let body = OpenRequestBody { query, exact_phrase: mode == QueryMode::ExactPhrase, page_size };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| SearchError::IndexTransient(err.to_string()))?;

        if response.status().is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SearchError::IndexMalformed(detail));
        }
        if !response.status().is_success() {
            return Err(SearchError::IndexTransient(format!("index returned status {}", response.status())));
        }

        Ok(IndexHandle::new(query, mode, page_size))
    }

    async fn next_page(&self, handle: &mut IndexHandle) -> Result<Page, SearchError> {
        let url = self.endpoint("search/page")?;
        let body = PageRequestBody {
            query: &handle.query,
            exact_phrase: handle.mode == QueryMode::ExactPhrase,
            page_size: handle.cursor.page_size,
            continuation_token: &handle.cursor.continuation_token,
        };
        let page = self.send_page_request(url, &body).await?;
        handle.cursor.advance(page.continuation_token);
        Ok(Page { events: page.events, more: page.more })
    }

    async fn close(&self, mut handle: IndexHandle) {
        handle.closed = true;
    }

    async fn fetch_by_ids(&self, ids: &[u64]) -> Result<Vec<Event>, SearchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint("search/fetch")?;
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await
            .map_err(|err| SearchError::IndexTransient(err.to_string()))?;

        if response.status().is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SearchError::IndexMalformed(detail));
        }
        if !response.status().is_success() {
            return Err(SearchError::IndexTransient(format!("index returned status {}", response.status())));
        }

        let body: FetchByIdsResponseBody = response.json().await.map_err(|err| SearchError::IndexTransient(err.to_string()))?;
        Ok(body.events)
    }
}
