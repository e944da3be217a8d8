//! Region accumulation for drawn text.
//!
//! Every time a text block is drawn, [`RegionAccumulator::record_regions`]
//! splits it at each configured granularity and records one bounding box per
//! sub-block. Boxes are computed from font metrics only; nothing is read back
//! from the rendered pixels.

use crate::error::SynthError;
use crate::ir::{AnnotationSet, Granularity, RegionPosition};
use crate::style::Typeface;
use crate::text::segment;

/// Which character blocks get a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharSampling {
    /// Only blocks at an even index within one `record_regions` call.
    #[default]
    EveryOther,
    /// Every character block.
    All,
}

impl CharSampling {
    fn records(self, index: usize) -> bool {
        match self {
            CharSampling::EveryOther => index % 2 == 0,
            CharSampling::All => true,
        }
    }
}

/// Collects regions for every image of a run.
#[derive(Clone, Debug)]
pub struct RegionAccumulator {
    modes: Vec<Granularity>,
    char_sampling: CharSampling,
    annotations: AnnotationSet,
}

impl RegionAccumulator {
    /// Accumulator recording the given granularities.
    ///
    /// Modes are kept in canonical order (characters first) without
    /// duplicates. An empty list is rejected.
    pub fn new(modes: &[Granularity]) -> Result<Self, SynthError> {
        if modes.is_empty() {
            return Err(SynthError::InvalidConfig {
                message: "at least one annotation mode is required".to_string(),
            });
        }

        let mut modes = modes.to_vec();
        modes.sort();
        modes.dedup();

        Ok(Self {
            modes,
            char_sampling: CharSampling::default(),
            annotations: AnnotationSet::new(),
        })
    }

    /// Set the character sampling policy.
    pub fn with_char_sampling(mut self, char_sampling: CharSampling) -> Self {
        self.char_sampling = char_sampling;
        self
    }

    /// Configured modes in canonical order.
    pub fn modes(&self) -> &[Granularity] {
        &self.modes
    }

    pub fn char_sampling(&self) -> CharSampling {
        self.char_sampling
    }

    /// Record the regions of `text` drawn with its top-left corner at
    /// `(start_x, start_y)`.
    ///
    /// Modes are swept from coarsest to finest. Within one mode the cursor
    /// only moves right, and every block is anchored to the bottom of the
    /// whole text, so a block shorter than the text gets a box that starts
    /// below `start_y`.
    pub fn record_regions(
        &mut self,
        image_id: &str,
        text: &str,
        start_x: i64,
        start_y: i64,
        font: &dyn Typeface,
    ) {
        let (_, full_height) = font.measure(text);
        let y_bottom = start_y + i64::from(full_height);

        for index in (0..self.modes.len()).rev() {
            let mode = self.modes[index];
            let mut cursor_x = start_x;

            for (block_index, block) in segment(text, mode, true).into_iter().enumerate() {
                let (block_w, block_h) = font.measure(block);
                let x_right = cursor_x + i64::from(block_w);

                if mode != Granularity::Character || self.char_sampling.records(block_index) {
                    let position = RegionPosition::new(
                        cursor_x,
                        y_bottom - i64::from(block_h),
                        x_right,
                        y_bottom,
                    );
                    self.record_region(image_id, block, position, mode);
                }

                cursor_x = x_right;
            }
        }
    }

    /// Append one region.
    pub fn record_region(
        &mut self,
        image_id: &str,
        text: &str,
        position: RegionPosition,
        granularity: Granularity,
    ) {
        self.annotations
            .record(image_id, granularity, text, position);
    }

    /// Record the canvas size written into the label file head.
    pub fn set_image_size(&mut self, image_id: &str, width: u32, height: u32) {
        self.annotations.set_size(image_id, width, height);
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn into_annotations(self) -> AnnotationSet {
        self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use image::RgbaImage;

    /// Every code point is 10px wide, every line 20px tall.
    struct Mono;

    impl Typeface for Mono {
        fn label(&self) -> String {
            "mono".to_string()
        }

        fn measure(&self, text: &str) -> (u32, u32) {
            let lines: Vec<&str> = text.split('\n').collect();
            let width = lines
                .iter()
                .map(|line| line.chars().count() as u32 * 10)
                .max()
                .unwrap_or(0);
            (width, lines.len() as u32 * 20)
        }

        fn draw(&self, _image: &mut RgbaImage, _text: &str, _x: i32, _y: i32, _color: Color) {}
    }

    #[test]
    fn empty_mode_list_is_rejected() {
        assert!(matches!(
            RegionAccumulator::new(&[]),
            Err(SynthError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn modes_are_canonicalized() {
        let accumulator = RegionAccumulator::new(&[
            Granularity::Paragraph,
            Granularity::Character,
            Granularity::Paragraph,
        ])
        .unwrap();
        assert_eq!(
            accumulator.modes(),
            &[Granularity::Character, Granularity::Paragraph]
        );
    }

    #[test]
    fn words_get_cursor_advanced_boxes() {
        let mut accumulator = RegionAccumulator::new(&[Granularity::Word]).unwrap();
        accumulator.record_regions("img", "AB CD", 5, 7, &Mono);

        let words = accumulator
            .annotations()
            .get("img")
            .unwrap()
            .regions(Granularity::Word);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text.as_deref(), Some("AB "));
        assert_eq!(words[0].position, RegionPosition::new(5, 7, 35, 27));
        assert_eq!(words[1].text.as_deref(), Some("CD"));
        assert_eq!(words[1].position, RegionPosition::new(35, 7, 55, 27));
    }

    #[test]
    fn lines_are_anchored_to_the_bottom_of_the_whole_text() {
        let mut accumulator = RegionAccumulator::new(&[Granularity::Paragraph]).unwrap();
        accumulator.record_regions("img", "ab\ncd", 0, 0, &Mono);

        let lines = accumulator
            .annotations()
            .get("img")
            .unwrap()
            .regions(Granularity::Paragraph);
        // "ab\n" measures as two lines, "cd" as one.
        assert_eq!(lines[0].position, RegionPosition::new(0, 0, 20, 40));
        assert_eq!(lines[1].position, RegionPosition::new(20, 20, 40, 40));
    }

    #[test]
    fn characters_are_sampled_every_other_by_default() {
        let mut accumulator = RegionAccumulator::new(&[Granularity::Character]).unwrap();
        accumulator.record_regions("img", "abcde", 0, 0, &Mono);

        let chars = accumulator
            .annotations()
            .get("img")
            .unwrap()
            .regions(Granularity::Character);
        let texts: Vec<&str> = chars.iter().filter_map(|r| r.text.as_deref()).collect();
        assert_eq!(texts, vec!["a", "c", "e"]);
        assert_eq!(chars[1].position.x_left, 20);
    }

    #[test]
    fn all_sampling_records_every_character() {
        let mut accumulator = RegionAccumulator::new(&[Granularity::Character])
            .unwrap()
            .with_char_sampling(CharSampling::All);
        accumulator.record_regions("img", "abcd", 0, 0, &Mono);

        assert_eq!(
            accumulator
                .annotations()
                .region_count(Granularity::Character),
            4
        );
    }

    #[test]
    fn every_configured_mode_is_recorded() {
        let mut accumulator =
            RegionAccumulator::new(&[Granularity::Word, Granularity::Article]).unwrap();
        accumulator.record_regions("img", "one two", 0, 0, &Mono);
        accumulator.set_image_size("img", 100, 50);

        let annotations = accumulator.into_annotations();
        let image = annotations.get("img").unwrap();
        assert_eq!(image.size, Some((100, 50)));
        assert_eq!(image.regions(Granularity::Word).len(), 2);
        assert_eq!(image.regions(Granularity::Article).len(), 1);
        assert_eq!(
            image.regions(Granularity::Article)[0].position,
            RegionPosition::new(0, 0, 70, 20)
        );
    }
}
