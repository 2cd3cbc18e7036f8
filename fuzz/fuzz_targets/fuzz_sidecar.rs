//! Fuzz target for sidecar metadata parsing.
//!
//! Parsing must return an error for bad input, never panic.

#![no_main]

use lc_config::RunMetadata;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = RunMetadata::from_yaml_str(text, Path::new("fuzz.yaml"));
    }
});
