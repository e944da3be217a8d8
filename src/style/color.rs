//! Text colors.

use std::fmt;
use std::path::Path;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::SynthError;
use crate::storage::Storage;

const COLOR_SEPARATOR: char = ',';

/// An RGB text color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Creates a color from its channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the `(r, g, b)` triple.
    pub fn to_tuple(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// Opaque RGBA pixel of this color.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red, self.green, self.blue, 255])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

/// Read a color list: one `r,g,b` triple per line, blank lines ignored.
pub fn read_colors(storage: &dyn Storage, path: &Path) -> Result<Vec<Color>, SynthError> {
    let text = storage.read_to_string(path)?;
    parse_colors(&text, path)
}

/// Parse a color list from text. `path` is only used for error messages.
pub fn parse_colors(text: &str, path: &Path) -> Result<Vec<Color>, SynthError> {
    text.lines()
        .enumerate()
        .filter(|(_, row)| !row.trim().is_empty())
        .map(|(index, row)| parse_row(row, path, index + 1))
        .collect()
}

/// Fuzz-only entrypoint for parsing a single `r,g,b` row.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_color_row(input: &str) -> Result<(), SynthError> {
    let _ = parse_row(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_row(row: &str, path: &Path, line: usize) -> Result<Color, SynthError> {
    let channels: Vec<&str> = row.split(COLOR_SEPARATOR).map(str::trim).collect();
    if channels.len() != 3 {
        return Err(SynthError::ColorParse {
            path: path.to_path_buf(),
            line,
            message: format!("expected 'r,g,b', got '{}'", row.trim()),
        });
    }

    let mut rgb = [0u8; 3];
    for (slot, raw) in rgb.iter_mut().zip(&channels) {
        *slot = raw.parse::<u8>().map_err(|_| SynthError::ColorParse {
            path: path.to_path_buf(),
            line,
            message: format!("channel '{raw}' is not an integer in 0..=255"),
        })?;
    }

    Ok(Color::new(rgb[0], rgb[1], rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[cfg(feature = "fuzzing")]
    #[test]
    fn fuzz_entrypoint_reports_row_errors() {
        assert!(fuzz_parse_color_row("1, 2, 3").is_ok());
        assert!(matches!(
            fuzz_parse_color_row("1,2"),
            Err(SynthError::ColorParse { line: 1, .. })
        ));
        assert!(fuzz_parse_color_row("300,0,0").is_err());
    }

    #[test]
    fn parses_rows_and_skips_blank_lines() {
        let colors = parse_colors("0,0,0\n\n255, 128 ,1\n", Path::new("colors.txt")).unwrap();
        assert_eq!(colors, vec![Color::new(0, 0, 0), Color::new(255, 128, 1)]);
    }

    #[test]
    fn reports_line_of_malformed_row() {
        let err = parse_colors("1,2,3\n1,2\n", Path::new("colors.txt")).unwrap_err();
        match err {
            SynthError::ColorParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_colors("1,2,300", Path::new("colors.txt")).is_err());
    }

    #[test]
    fn reads_through_storage() {
        let storage = MemoryStorage::new();
        storage.insert("colors.txt", "10,20,30");
        let colors = read_colors(&storage, Path::new("colors.txt")).unwrap();
        assert_eq!(colors[0].to_tuple(), (10, 20, 30));
        assert_eq!(colors[0].to_rgba(), Rgba([10, 20, 30, 255]));
    }
}
