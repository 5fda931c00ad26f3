// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for tfjunit-parser

use thiserror::Error;

/// Errors that abort a parse
///
/// Unrecognized lines and malformed numbers never surface here; the parser
/// degrades to best-effort output for those.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Error reading from the input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
