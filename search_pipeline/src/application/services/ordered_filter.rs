// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ordered Concurrent Filter
//!
//! The heart of the pipeline. Pulls batches from a [`Batcher`], runs up to
//! `K` authorization calls in flight, and emits filtered events in
//! **submission order** — batch N's survivors precede batch N+1's,
//! regardless of which batch's worker finishes first.
//!
//! ## The ordered window
//!
//! A FIFO queue of *tickets* tracks in-flight work. Each ticket owns a
//! [`tokio::sync::oneshot::Receiver`] that its worker publishes filtered
//! survivors into. On every pull:
//!
//! 1. **Top up.** While fewer than `K` tickets are outstanding and the
//!    upstream Batcher isn't exhausted, pull the next batch and spawn a
//!    worker for it.
//! 2. **Await the head.** Wait for the oldest ticket's slot to complete.
//! 3. **Forward survivors.** Hand them to the caller one at a time.
//! 4. **Empty-batch continuation.** If the head's survivors are empty,
//!    don't stop — loop back to step 1. An empty batch must never
//!    terminate the pipeline.
//! 5. **Termination.** Once the Batcher is exhausted and the ticket queue
//!    is empty, the filter is done.
//!
//! This is a hand-rolled `VecDeque`, not a reactive combinator chain:
//! workers complete out of order, but the ticket queue re-serializes them
//! at the point of consumption.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use search_pipeline_domain::error::SearchError;
use search_pipeline_domain::value_objects::{Batch, Event};
use search_pipeline_domain::AuthorizerClient;

use crate::application::services::batcher::Batcher;
use crate::infrastructure::metrics::PipelineMetrics;

/// Concurrency and per-call deadline for the authorization fan-out.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFilterConfig {
    pub concurrency: usize,
    pub auth_deadline: Duration,
}

struct Ticket {
    submission_index: u64,
    receiver: oneshot::Receiver<Vec<Event>>,
}

/// Runs the ordered window over a `Batcher`'s output.
pub struct OrderedFilter {
    batcher: Batcher,
    authorizer: Arc<dyn AuthorizerClient>,
    user_id: String,
    config: OrderedFilterConfig,
    tickets: VecDeque<Ticket>,
    /// Survivors from the most recently completed head ticket, not yet all
    /// handed to the caller.
    current_survivors: VecDeque<Event>,
    metrics: Arc<PipelineMetrics>,
}

impl OrderedFilter {
    pub fn new(
        batcher: Batcher,
        authorizer: Arc<dyn AuthorizerClient>,
        user_id: String,
        config: OrderedFilterConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            batcher,
            authorizer,
            user_id,
            config,
            tickets: VecDeque::new(),
            current_survivors: VecDeque::new(),
            metrics,
        }
    }

    /// Yields the next authorized event in source order, or `None` once the
    /// source is exhausted and every submitted batch has drained.
    #[tracing::instrument(skip(self), fields(tickets_in_flight = self.tickets.len()))]
    pub async fn next(&mut self) -> Result<Option<Event>, SearchError> {
        loop {
            if let Some(event) = self.current_survivors.pop_front() {
                return Ok(Some(event));
            }

            self.top_up().await?;

            let head = match self.tickets.pop_front() {
                Some(ticket) => ticket,
                None => return Ok(None),
            };

            // A worker sends "empty" on its own error path (fail-closed);
            // a dropped sender (panic) is treated the same way.
            let survivors = head.receiver.await.unwrap_or_default();
            self.metrics.record_batch_completed();
            tracing::debug!(submission_index = head.submission_index, survivors = survivors.len(), "batch drained");

            if survivors.is_empty() {
                continue;
            }
            self.current_survivors = survivors.into();
        }
    }

    async fn top_up(&mut self) -> Result<(), SearchError> {
        while self.tickets.len() < self.config.concurrency && !self.batcher.is_exhausted() {
            match self.batcher.next_batch().await? {
                Some(batch) => self.tickets.push_back(self.submit(batch)),
                None => break,
            }
        }
        Ok(())
    }

    fn submit(&self, batch: Batch) -> Ticket {
        let submission_index = batch.submission_index;
        let (sender, receiver) = oneshot::channel();
        let authorizer = Arc::clone(&self.authorizer);
        let user_id = self.user_id.clone();
        let deadline = self.config.auth_deadline;
        let metrics = Arc::clone(&self.metrics);

        self.metrics.record_batch_submitted();
        tokio::spawn(async move {
            let survivors = authorize_and_filter(authorizer, &user_id, deadline, batch, &metrics).await;
            // If the receiver was dropped (cancellation), there is nothing
            // to do with this result; the caller already moved on.
            let _ = sender.send(survivors);
        });

        Ticket { submission_index, receiver }
    }

    /// Abandons all in-flight tickets and releases the underlying
    /// `IndexSource` handle. Called when the global limit is reached or the
    /// search is cancelled externally.
    pub async fn cancel(mut self) {
        self.tickets.clear();
        self.batcher.close().await;
    }
}

async fn authorize_and_filter(
    authorizer: Arc<dyn AuthorizerClient>,
    user_id: &str,
    deadline: Duration,
    batch: Batch,
    metrics: &PipelineMetrics,
) -> Vec<Event> {
    if batch.is_empty() {
        return Vec::new();
    }
    let ids = batch.event_ids();
    metrics.record_authorization_call();
    let result = match tokio::time::timeout(deadline, authorizer.check_batch(&ids, user_id, deadline)).await {
        Ok(result) => result,
        Err(_elapsed) => {
            metrics.record_authorization_timeout();
            search_pipeline_domain::value_objects::AuthorizationResult::empty()
        }
    };
    batch.events.into_iter().filter(|event| result.is_authorized(event.id)).collect()
}
