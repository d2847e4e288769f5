// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Search Pipeline
//!
//! The application and infrastructure layers of a permission-filtered,
//! streaming full-text search service. The hard part lives entirely in
//! `application::services`: a pull-driven, bounded-concurrency,
//! order-preserving pipeline that interleaves paginated index reads with
//! batched authorization checks.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                         │
//! │  Batcher → Ordered Concurrent Filter → Pipeline Driver       │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Infrastructure Layer                        │
//! │  HttpIndexSource, HttpAuthorizerClient, config, logging,     │
//! │  metrics                                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │              search_pipeline_domain (ports)                 │
//! │  Event, SearchRequest, Batch, AuthorizationResult,           │
//! │  IndexSource, AuthorizerClient, SearchError                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The Batcher pulls from an `IndexSource`, grouping events into ordered
//! batches on a size-or-time trigger. The Ordered Concurrent Filter runs up
//! to `K` authorization calls concurrently while guaranteeing the caller
//! sees survivors in submission order, never stalling on an empty batch.
//! The Pipeline Driver composes both, adds the query-less fast path and the
//! global result ceiling, and exposes a single lazy, cancellable stream.

pub mod application;
pub mod infrastructure;

pub use application::services::{Batcher, BatcherConfig, OrderedFilter, OrderedFilterConfig, PipelineDriver, PipelineDriverConfig};
pub use infrastructure::{HttpAuthorizerClient, HttpIndexSource, PipelineConfig, PipelineMetrics};
