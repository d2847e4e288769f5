// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging Initialization
//!
//! Installs a `tracing-subscriber` global subscriber driven by `RUST_LOG`,
//! defaulting to `info` when unset. One-shot at startup; there is no
//! hot-reload or per-tenant filtering here, unlike the wider pipeline's
//! observability stack.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Safe to call once at process
/// startup; calling it twice returns an error that callers should treat as
/// non-fatal (it usually means a test harness already installed one).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
