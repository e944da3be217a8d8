//! Summary of one generation run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::SynthError;
use crate::ir::Granularity;

/// Counters collected while a [`Generator`](super::Generator) runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub backgrounds: usize,
    pub text_files: usize,
    /// Font and size combinations.
    pub fonts: usize,
    pub colors: usize,

    /// Images carrying text and annotations.
    pub images_written: usize,
    /// Augmented copies of texted images, written without annotations.
    pub variants_written: usize,

    /// Blocks placed, counted once per background, text file and font.
    pub blocks_packed: usize,
    /// Blocks that did not fit, counted the same way.
    pub blocks_dropped: usize,

    pub annotation_files: usize,
    pub regions: BTreeMap<Granularity, usize>,
}

impl RunReport {
    /// Total regions over all granularities.
    pub fn region_total(&self) -> usize {
        self.regions.values().sum()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SynthError> {
        serde_json::to_string_pretty(self).map_err(|source| SynthError::ReportJsonWrite { source })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {} image(s) and {} augmented variant(s)",
            self.images_written, self.variants_written
        )?;
        writeln!(
            f,
            "  inputs: {} background(s), {} text file(s), {} font size(s), {} color(s)",
            self.backgrounds, self.text_files, self.fonts, self.colors
        )?;
        writeln!(
            f,
            "  blocks: {} packed, {} dropped",
            self.blocks_packed, self.blocks_dropped
        )?;
        writeln!(
            f,
            "  annotations: {} file(s), {} region(s)",
            self.annotation_files,
            self.region_total()
        )?;
        for (granularity, count) in &self.regions {
            writeln!(f, "    {:<10} {}", granularity.name(), count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_regions_per_granularity() {
        let mut report = RunReport {
            images_written: 2,
            blocks_packed: 5,
            blocks_dropped: 1,
            annotation_files: 2,
            ..RunReport::default()
        };
        report.regions.insert(Granularity::Word, 7);
        report.regions.insert(Granularity::Character, 3);

        let text = report.to_string();
        assert!(text.starts_with("Generated 2 image(s)"));
        assert!(text.contains("5 packed, 1 dropped"));
        assert!(text.contains("2 file(s), 10 region(s)"));
        let chars = text.find("chars").expect("chars row");
        let words = text.find("words").expect("words row");
        assert!(chars < words);
    }

    #[test]
    fn json_uses_granularity_names_as_keys() {
        let mut report = RunReport::default();
        report.regions.insert(Granularity::Sentence, 1);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"sentence\": 1"));
    }
}
