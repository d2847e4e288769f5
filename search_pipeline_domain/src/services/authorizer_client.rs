// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Authorizer Client Port
//!
//! Adapts a remote batch permission endpoint to the core's filtering needs.
//! Every call is bounded by a per-call deadline. On deadline expiry,
//! connection-level failure, or a server error, implementations must return
//! the fail-closed empty result rather than propagating an error — a
//! transient authorization failure must never expose events the user may
//! not see, and must not abort an otherwise-useful streaming response.

use std::time::Duration;

use async_trait::async_trait;

use crate::value_objects::AuthorizationResult;

/// Port to the external authorization service.
#[async_trait]
pub trait AuthorizerClient: Send + Sync {
    /// Returns the subset of `event_ids` the user may see. Empty input
    /// yields an empty result without a round-trip. Never returns `Err`:
    /// failures resolve to `AuthorizationResult::empty()`.
    async fn check_batch(&self, event_ids: &[u64], user_id: &str, deadline: Duration) -> AuthorizationResult;

    /// Returns the full allowed id set for a user, for the query-less fast
    /// path. Never returns `Err`: failures resolve to an empty set.
    async fn enumerate_for_user(&self, user_id: &str, deadline: Duration) -> Vec<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct AlwaysEmptyClient {
        called: AtomicBool,
    }

    #[async_trait]
    impl AuthorizerClient for AlwaysEmptyClient {
        async fn check_batch(&self, event_ids: &[u64], _user_id: &str, _deadline: Duration) -> AuthorizationResult {
            self.called.store(true, Ordering::SeqCst);
            if event_ids.is_empty() {
                AuthorizationResult::empty()
            } else {
                AuthorizationResult::new(HashSet::new())
            }
        }

        async fn enumerate_for_user(&self, _user_id: &str, _deadline: Duration) -> Vec<u64> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn empty_input_still_reaches_the_port_but_authorizes_nothing() {
        let client = AlwaysEmptyClient { called: AtomicBool::new(false) };
        let result = client.check_batch(&[], "user-1", Duration::from_secs(1)).await;
        assert!(result.is_empty());
    }
}
