// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Search Pipeline Domain
//!
//! The pure business logic of the permission-filtered streaming search
//! pipeline: the data it moves, the errors it raises, and the two ports
//! (`IndexSource`, `AuthorizerClient`) infrastructure must implement. This
//! crate has no I/O of its own — no HTTP client, no runtime beyond what the
//! `async_trait` ports require at the type level.
//!
//! ## Value Objects
//!
//! `Event`, `SearchRequest`, `Batch`, `AuthorizationResult`,
//! `PipelineCursor`, `IndexCursor` — all immutable, self-validating where a
//! business rule applies (`SearchRequest` rejects an empty user id).
//!
//! ## Services (ports)
//!
//! `IndexSource` and `AuthorizerClient` are `#[async_trait]` traits;
//! concrete HTTP-backed implementations live in the `search_pipeline` crate.

pub mod error;
pub mod services;
pub mod value_objects;

pub use error::SearchError;
pub use services::{AuthorizerClient, IndexHandle, IndexSource, Page};
pub use value_objects::{AuthorizationResult, Batch, Event, IndexCursor, PipelineCursor, QueryMode, SearchRequest};
