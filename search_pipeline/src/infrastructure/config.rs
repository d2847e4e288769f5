// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Configuration
//!
//! Loads [`PipelineConfig`] from a base `config/default.toml`, an optional
//! environment-specific TOML layered on top, an optional caller-supplied
//! override file, and `SEARCH_PIPELINE__*` environment variable overrides on
//! top of that. A single validated load at startup; no hot reload.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use search_pipeline_domain::error::SearchError;

fn default_concurrency() -> usize {
    4
}
fn default_batch_size() -> usize {
    50
}
fn default_batch_delay_ms() -> u64 {
    250
}
fn default_limit() -> u32 {
    100
}
fn default_auth_deadline_ms() -> u64 {
    2_000
}
fn default_pool_max_connections() -> usize {
    32
}
fn default_pool_pending_acquire_timeout_ms() -> u64 {
    5_000
}
fn default_pool_max_idle_time_ms() -> u64 {
    30_000
}
fn default_pool_max_life_time_ms() -> u64 {
    600_000
}
fn default_index_page_size() -> u32 {
    200
}

/// Validated pipeline configuration, one field per entry in the
/// configuration surface documented for the core.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// K — max in-flight authorization calls per request.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Max events per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Substituted when the caller's limit is null or non-positive.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_auth_deadline_ms")]
    pub auth_deadline_ms: u64,

    /// Authorizer Client connection ceiling.
    #[serde(default = "default_pool_max_connections")]
    pub pool_max_connections: usize,

    /// Bounds queueing at the connection pool.
    #[serde(default = "default_pool_pending_acquire_timeout_ms")]
    pub pool_pending_acquire_timeout_ms: u64,

    #[serde(default = "default_pool_max_idle_time_ms")]
    pub pool_max_idle_time_ms: u64,

    #[serde(default = "default_pool_max_life_time_ms")]
    pub pool_max_life_time_ms: u64,

    /// Page size for deep pagination against the Index Source.
    #[serde(default = "default_index_page_size")]
    pub index_page_size: u32,

    pub index_url: String,
    pub authz_url: String,
}

impl PipelineConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn auth_deadline(&self) -> Duration {
        Duration::from_millis(self.auth_deadline_ms)
    }

    pub fn pool_pending_acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.pool_pending_acquire_timeout_ms)
    }

    pub fn pool_max_idle_time(&self) -> Duration {
        Duration::from_millis(self.pool_max_idle_time_ms)
    }

    pub fn pool_max_life_time(&self) -> Duration {
        Duration::from_millis(self.pool_max_life_time_ms)
    }

    fn validate(self) -> Result<Self, SearchError> {
        if self.concurrency == 0 {
            return Err(SearchError::InvalidConfiguration("concurrency must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(SearchError::InvalidConfiguration("batch_size must be at least 1".into()));
        }
        if self.index_url.trim().is_empty() {
            return Err(SearchError::InvalidConfiguration("index_url must not be empty".into()));
        }
        if self.authz_url.trim().is_empty() {
            return Err(SearchError::InvalidConfiguration("authz_url must not be empty".into()));
        }
        Ok(self)
    }

    /// Loads configuration from `config/default.toml`, an optional
    /// `config/{env}.toml` (where `env` is read from `RUN_ENV`, defaulting
    /// to `"development"`), an optional caller-supplied `override_path`
    /// (e.g. a `--config` flag), and `SEARCH_PIPELINE__*` environment
    /// variables, in that order of precedence.
    pub fn load(override_path: Option<&Path>) -> Result<Self, SearchError> {
        let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_env}")).required(false));

        if let Some(path) = override_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("SEARCH_PIPELINE").separator("__"))
            .build()
            .map_err(config_load_error)?;

        config
            .try_deserialize::<PipelineConfig>()
            .map_err(config_load_error)?
            .validate()
    }
}

fn config_load_error(err: ConfigError) -> SearchError {
    SearchError::InvalidConfiguration(err.to_string())
}
