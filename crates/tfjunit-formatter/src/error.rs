// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for tfjunit-formatter

use thiserror::Error;

/// Errors that can occur while rendering a report
#[derive(Debug, Error)]
pub enum FormatError {
    /// Error writing to the output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing JSON
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error serializing JUnit XML
    #[error("XML serialize error: {0}")]
    Xml(#[from] quick_junit::SerializeError),
}
