#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Rectangle sizes, some of them wider or taller than typical canvases.
pub fn arb_sizes(max_len: usize) -> impl Strategy<Value = Vec<(u32, u32)>> {
    proptest::collection::vec((0u32..=120, 0u32..=80), 0..=max_len)
}

/// Text mixing words, sentence ends, abbreviations, newlines and Cyrillic.
pub fn arb_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("([A-Za-zА-Яа-я]{0,6}[ .?\n]{0,2}){0,12}")
        .expect("valid text regex")
}
