//! Fuzz target for color list parsing.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use ocr_synth::style::{fuzz_parse_color_row, parse_colors};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_colors(text, Path::new("<fuzz>"));
    for row in text.lines() {
        let _ = fuzz_parse_color_row(row);
    }
});
