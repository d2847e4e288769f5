// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Batch Value Object
//!
//! A contiguous, ordered slice of the index stream, created by the Batcher
//! and consumed by exactly one authorization call. The `submission_index`
//! is what lets the Ordered Concurrent Filter re-serialize results that
//! complete out of order.

use crate::value_objects::Event;

/// A group of events dispatched together for authorization checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub submission_index: u64,
    pub events: Vec<Event>,
}

impl Batch {
    pub fn new(submission_index: u64, events: Vec<Event>) -> Self {
        Self { submission_index, events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// The ids of every event in this batch, in order, for submission to
    /// the Authorizer Client.
    pub fn event_ids(&self) -> Vec<u64> {
        self.events.iter().map(|event| event.id).collect()
    }
}
