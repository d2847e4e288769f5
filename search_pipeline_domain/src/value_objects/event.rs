// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Event Value Object
//!
//! The unit document produced by the Index Source and consumed by the
//! client. An `Event` is immutable once constructed: the pipeline only ever
//! reorders, filters, or drops events, never mutates their fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single indexed document flowing through the pipeline.
///
/// Identified by an opaque 64-bit id assigned by the index; the pipeline
/// never interprets the id's internal structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub description: String,
}

impl Event {
    pub fn new(id: u64, timestamp: DateTime<Utc>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            timestamp,
            title: title.into(),
            description: description.into(),
        }
    }
}
