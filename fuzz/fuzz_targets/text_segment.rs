//! Fuzz target for text segmentation.
//!
//! Every granularity must split arbitrary UTF-8 without panicking, and the
//! blocks kept with their separators must concatenate back to the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ocr_synth::ir::Granularity;
use ocr_synth::text::segment;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for granularity in Granularity::ALL {
        assert_eq!(segment(text, granularity, true).concat(), text);
        let _ = segment(text, granularity, false);
    }
});
