// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Batcher
//!
//! Transforms the Index Source's page-wise stream into a stream of
//! `Batch`es with a size-or-time trigger: a batch closes when `max_size`
//! events have accumulated or `max_delay` has elapsed since the first event
//! of the current batch, whichever comes first. Order is preserved; batch
//! N's events all precede batch N+1's in source order, and submission
//! indices are assigned 0, 1, 2, ….

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use search_pipeline_domain::error::SearchError;
use search_pipeline_domain::services::index_source::IndexHandle;
use search_pipeline_domain::value_objects::{Batch, Event};
use search_pipeline_domain::IndexSource;

/// Size-or-time batching parameters.
#[derive(Debug, Clone, Copy)]
pub struct BatcherConfig {
    pub max_size: usize,
    pub max_delay: Duration,
}

/// Groups one `IndexSource` handle's events into ordered batches.
pub struct Batcher {
    source: Arc<dyn IndexSource>,
    handle: Option<IndexHandle>,
    config: BatcherConfig,
    pending: VecDeque<Event>,
    next_submission_index: u64,
    source_exhausted: bool,
}

impl Batcher {
    pub fn new(source: Arc<dyn IndexSource>, handle: IndexHandle, config: BatcherConfig) -> Self {
        Self {
            source,
            handle: Some(handle),
            config,
            pending: VecDeque::new(),
            next_submission_index: 0,
            source_exhausted: false,
        }
    }

    /// Whether the Batcher has nothing left to emit: the source is
    /// exhausted and no events remain buffered.
    pub fn is_exhausted(&self) -> bool {
        self.source_exhausted && self.pending.is_empty()
    }

    /// Pulls the next batch, blocking on upstream pagination as needed.
    /// Returns `None` once `is_exhausted()` would be true.
    pub async fn next_batch(&mut self) -> Result<Option<Batch>, SearchError> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let deadline = Instant::now() + self.config.max_delay;
        while self.pending.len() < self.config.max_size && !self.source_exhausted {
            if self.pending.is_empty() {
                // No partial batch yet: there is nothing for max_delay to
                // bound, so wait as long as the source takes to answer.
                self.fill_from_source().await?;
                continue;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match tokio::time::timeout(remaining, self.fill_from_source()).await {
                Ok(result) => result?,
                Err(_elapsed) => break,
            }
        }

        if self.pending.is_empty() {
            return Ok(None);
        }

        let take = self.config.max_size.min(self.pending.len());
        let events: Vec<Event> = self.pending.drain(..take).collect();
        let index = self.next_submission_index;
        self.next_submission_index += 1;
        Ok(Some(Batch::new(index, events)))
    }

    async fn fill_from_source(&mut self) -> Result<(), SearchError> {
        let handle = self.handle.as_mut().expect("handle present while source is not exhausted");
        let page = match self.source.next_page(handle).await {
            Ok(page) => page,
            Err(SearchError::IndexTransient(reason)) => {
                tracing::warn!(reason = %reason, "index source page fetch failed, treating stream as exhausted at this point");
                self.source_exhausted = true;
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        self.pending.extend(page.events);
        if !page.more {
            self.source_exhausted = true;
        }
        Ok(())
    }

    /// Releases the underlying `IndexSource` handle. Called once the
    /// Batcher has yielded its final batch.
    pub async fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.source.close(handle).await;
        }
    }
}
