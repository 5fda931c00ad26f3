// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the parser
//!
//! Arbitrary bytes, including invalid UTF-8, must never panic the parser.

#![no_main]

use libfuzzer_sys::fuzz_target;

use tfjunit_parser::parse;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = parse(data, Some("fuzz")) {
        // A parse always yields at least one package
        assert!(!report.is_empty());
    }
});
