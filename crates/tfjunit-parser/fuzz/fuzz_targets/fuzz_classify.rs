// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for line classification and phase markers

#![no_main]

use libfuzzer_sys::fuzz_target;

use tfjunit_parser::classify;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = classify::classify(line);
        let _ = classify::resource_action(line);
        let _ = classify::parse_log_timestamp(line);
        let _ = classify::is_destroy_start(line);
    }
});
