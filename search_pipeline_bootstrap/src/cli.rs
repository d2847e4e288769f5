// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI for the search pipeline demo binary: runs one search
//! against a configured index and authorizer endpoint and streams the
//! results to stdout as NDJSON.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parse_cli()                     │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate()                      │  Range/non-empty checks
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```

use clap::Parser;
use thiserror::Error;

/// Errors raised while parsing or validating CLI arguments.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid value for --{arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Raw CLI arguments as parsed by clap, before validation.
#[derive(Debug, Parser)]
#[command(name = "search-pipeline", about = "Run one permission-filtered search against the pipeline core")]
pub struct Cli {
    /// Search query. Omit for the query-less fast path. Wrap in double
    /// quotes for an exact-phrase search, e.g. "\"annual report\"".
    #[arg(long, default_value = "")]
    pub query: String,

    /// User id the search runs on behalf of.
    #[arg(long)]
    pub user_id: String,

    /// Maximum number of events to emit. Non-positive falls back to the
    /// configured default.
    #[arg(long)]
    pub limit: Option<i64>,

    /// Base URL of the full-text index service.
    #[arg(long)]
    pub index_url: String,

    /// Base URL of the authorization service.
    #[arg(long)]
    pub authz_url: String,

    /// Max in-flight authorization calls (overrides configuration).
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to an optional configuration file, layered over the defaults.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Enable debug-level logging.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// CLI arguments after validation: non-empty user id, positive
/// concurrency override if present.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub query: String,
    pub user_id: String,
    pub limit: Option<i64>,
    pub index_url: String,
    pub authz_url: String,
    pub concurrency: Option<usize>,
    pub config: Option<std::path::PathBuf>,
    pub verbose: bool,
}

/// Parses and validates CLI arguments in one step.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate(parse_cli())
}

fn validate(cli: Cli) -> Result<ValidatedCli, ParseError> {
    if cli.user_id.trim().is_empty() {
        return Err(ParseError::InvalidValue {
            arg: "user-id".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(concurrency) = cli.concurrency {
        if concurrency == 0 {
            return Err(ParseError::InvalidValue {
                arg: "concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
    }

    if cli.index_url.trim().is_empty() {
        return Err(ParseError::InvalidValue {
            arg: "index-url".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if cli.authz_url.trim().is_empty() {
        return Err(ParseError::InvalidValue {
            arg: "authz-url".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(ValidatedCli {
        query: cli.query,
        user_id: cli.user_id,
        limit: cli.limit,
        index_url: cli.index_url,
        authz_url: cli.authz_url,
        concurrency: cli.concurrency,
        config: cli.config,
        verbose: cli.verbose,
    })
}
