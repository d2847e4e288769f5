// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Index Source Port
//!
//! A lazy, restartable, finite, ordered sequence of `Event`s matching a
//! query, one page at a time. The domain defines this trait; infrastructure
//! provides the concrete adapter that talks to the full-text index over
//! HTTP.
//!
//! Order across `next_page` calls follows the index's own ranking and is
//! deterministic for a given index state; no event is yielded twice within
//! one handle's lifetime. The Source never materializes the full result
//! set — deep pagination is carried entirely by the opaque continuation
//! token inside `IndexHandle`.

use async_trait::async_trait;

use crate::error::SearchError;
use crate::value_objects::{Event, IndexCursor, QueryMode};

/// A restartable pagination handle: the query and mode it was opened with,
/// plus the cursor advanced by successive `next_page` calls. Kept as a
/// plain struct (not an associated type on the trait) so `IndexSource` stays
/// object-safe and can be held as `Arc<dyn IndexSource>`.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    pub query: String,
    pub mode: QueryMode,
    pub cursor: IndexCursor,
    pub closed: bool,
}

impl IndexHandle {
    pub fn new(query: impl Into<String>, mode: QueryMode, page_size: u32) -> Self {
        Self {
            query: query.into(),
            mode,
            cursor: IndexCursor::start(page_size),
            closed: false,
        }
    }
}

/// One page of results: the events themselves, and whether more pages
/// remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub events: Vec<Event>,
    pub more: bool,
}

/// Port to the external full-text index.
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Opens a new pagination handle for `query` under the given mode.
    async fn open(&self, query: &str, mode: QueryMode) -> Result<IndexHandle, SearchError>;

    /// Yields the next page of up to `handle.cursor.page_size` events and
    /// advances the handle's cursor in place. Returns an empty page with
    /// `more = false` once the handle is exhausted.
    async fn next_page(&self, handle: &mut IndexHandle) -> Result<Page, SearchError>;

    /// Releases pagination resources held by `handle`. Idempotent.
    async fn close(&self, handle: IndexHandle);

    /// Single round-trip bulk lookup by id, used by the query-less fast
    /// path. The result is total (every requested id that exists is
    /// returned) but not ordered relative to `ids`.
    async fn fetch_by_ids(&self, ids: &[u64]) -> Result<Vec<Event>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handle_starts_unclosed_with_no_continuation() {
        let handle = IndexHandle::new("rust", QueryMode::FreeText, 50);
        assert!(!handle.closed);
        assert!(handle.cursor.continuation_token.is_none());
    }
}
