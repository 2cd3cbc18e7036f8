//! Fuzz target for chat log line classification.
//!
//! Arbitrary bytes are streamed through the log reader and the
//! accumulator; neither may panic.

#![no_main]

use lc_config::AccumulatorSettings;
use lc_core::cycle::{fold_events, CostParams};
use lc_core::events::{classify_line, Event, LogReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = classify_line(text);
    }

    let events: Vec<Event> = LogReader::new(data).filter_map(Result::ok).collect();
    let _ = fold_events(&events, &AccumulatorSettings::default(), CostParams::new(0.05));
});
