// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure ports: traits the domain depends on and infrastructure
//! implements, following the dependency-inversion boundary used throughout
//! this codebase.

pub mod authorizer_client;
pub mod index_source;

pub use authorizer_client::AuthorizerClient;
pub use index_source::{IndexHandle, IndexSource, Page};
