//! Text styling inputs: colors and fonts.

mod color;
mod font;

#[cfg(feature = "fuzzing")]
pub use color::fuzz_parse_color_row;
pub use color::{parse_colors, read_colors, Color};
pub use font::{Font, FontCatalog, StorageFonts, Typeface, LINE_SPACING};
