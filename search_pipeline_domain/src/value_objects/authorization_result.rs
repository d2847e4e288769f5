// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Authorization Result Value Object
//!
//! The outcome of one `check_batch` call: the subset of a batch's event ids
//! the calling user may see. A failed or timed-out call is represented the
//! same way as a call that legitimately authorized nothing — both resolve
//! to `AuthorizationResult::empty()` (fail-closed).

use std::collections::HashSet;

/// The authorized subset of one batch's event ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    authorized_ids: HashSet<u64>,
}

impl AuthorizationResult {
    pub fn new(authorized_ids: HashSet<u64>) -> Self {
        Self { authorized_ids }
    }

    /// The fail-closed result: nothing authorized.
    pub fn empty() -> Self {
        Self { authorized_ids: HashSet::new() }
    }

    pub fn is_authorized(&self, event_id: u64) -> bool {
        self.authorized_ids.contains(&event_id)
    }

    pub fn is_empty(&self) -> bool {
        self.authorized_ids.is_empty()
    }
}
