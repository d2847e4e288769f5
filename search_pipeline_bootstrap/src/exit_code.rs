// /////////////////////////////////////////////////////////////////////////////
// Search Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Process Exit Codes
//!
//! Maps application-level outcomes to Unix `sysexits.h`-style exit codes, so
//! a caller scripting this binary gets a stable, documented contract instead
//! of a bare 0/1.

use search_pipeline_domain::error::SearchError;

/// Unix exit codes following the `sysexits.h` convention used elsewhere in
/// this codebase's CLI tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Successful termination.
    Ok = 0,
    /// Command line usage error.
    Usage = 64,
    /// Input data was incorrect.
    DataErr = 65,
    /// A remote service is unavailable.
    Unavailable = 69,
    /// Internal software error.
    Software = 70,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Maps a driver-level error to the exit code a caller should see. Only
/// `RequestInvalid` and `IndexMalformed` are caller-visible per the domain's
/// error taxonomy; everything else the pipeline already recovers from
/// internally, so reaching this function with any other variant indicates a
/// bootstrap-level failure (misconfiguration, unreachable dependency).
pub fn map_error_to_exit_code(error: &SearchError) -> ExitCode {
    match error {
        SearchError::RequestInvalid(_) => ExitCode::Usage,
        SearchError::IndexMalformed(_) => ExitCode::DataErr,
        SearchError::InvalidConfiguration(_) => ExitCode::Usage,
        SearchError::IndexTransient(_) | SearchError::AuthTransient(_) | SearchError::AuthTimeout(_) => {
            ExitCode::Unavailable
        }
        SearchError::Cancelled(_) => ExitCode::Ok,
        SearchError::InternalError(_) => ExitCode::Software,
    }
}

/// Converts a top-level `Result` into a process exit code, for use as the
/// return value of `main`.
pub fn result_to_exit_code(result: Result<(), SearchError>) -> std::process::ExitCode {
    match result {
        Ok(()) => ExitCode::Ok.into(),
        Err(error) => map_error_to_exit_code(&error).into(),
    }
}
