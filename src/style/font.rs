//! Font metrics and text drawing.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{point, Font as _, FontVec, PxScale, ScaleFont};
use image::RgbaImage;
use imageproc::drawing::draw_text_mut;

use super::Color;
use crate::error::SynthError;
use crate::storage::{list_files, FileFilter, Storage};

/// Vertical gap between lines of multi-line text, in pixels.
pub const LINE_SPACING: u32 = 4;

/// Measures and draws text at one size.
pub trait Typeface {
    /// Human-readable identity, e.g. `fonts/Roboto.ttf@32`.
    fn label(&self) -> String;

    /// `(width, height)` of possibly multi-line text.
    ///
    /// Width is the widest line. Multi-line text is `lines * line_height +
    /// (lines - 1) * LINE_SPACING` tall. A single line is measured from its
    /// top to the lowest glyph bottom, so blocks without descenders are
    /// shorter than blocks with them.
    fn measure(&self, text: &str) -> (u32, u32);

    /// Draw text with its top-left corner at `(x, y)`.
    fn draw(&self, image: &mut RgbaImage, text: &str, x: i32, y: i32, color: Color);
}

/// Yields one typeface per font file and size.
pub trait FontCatalog {
    /// Every font at every size in `sizes`, font-major order.
    fn fonts(&self, sizes: Range<u32>) -> Result<Vec<Box<dyn Typeface>>, SynthError>;
}

/// A TrueType/OpenType font at a fixed pixel size.
#[derive(Clone)]
pub struct Font {
    path: PathBuf,
    size: u32,
    face: Arc<FontVec>,
}

impl Font {
    /// Parse a font from bytes.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>, size: u32) -> Result<Self, SynthError> {
        let face = FontVec::try_from_vec(bytes).map_err(|err| SynthError::FontLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            size,
            face: Arc::new(face),
        })
    }

    /// Read and parse the font at `path` through `storage`.
    pub fn load(storage: &dyn Storage, path: &Path, size: u32) -> Result<Self, SynthError> {
        let bytes = storage.read(path)?;
        Self::from_bytes(path, bytes, size)
    }

    /// The same face at another size, sharing the parsed font data.
    pub fn with_size(&self, size: u32) -> Self {
        Self {
            path: self.path.clone(),
            size,
            face: Arc::clone(&self.face),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn scale(&self) -> PxScale {
        PxScale::from(self.size as f32)
    }

    /// Distance between the tops of two consecutive lines, minus
    /// [`LINE_SPACING`].
    pub fn line_height(&self) -> u32 {
        let scaled = self.face.as_scaled(self.scale());
        (scaled.ascent() - scaled.descent()).ceil().max(0.0) as u32
    }

    /// Lowest glyph bottom of one line, measured from the line top.
    ///
    /// Lines without any outlined glyph end at the baseline.
    fn glyph_bottom(&self, line: &str) -> u32 {
        let scaled = self.face.as_scaled(self.scale());
        let baseline = scaled.ascent();
        line.chars()
            .filter_map(|ch| {
                let mut glyph = scaled.scaled_glyph(ch);
                glyph.position = point(0.0, baseline);
                scaled.outline_glyph(glyph)
            })
            .map(|outlined| outlined.px_bounds().max.y)
            .reduce(f32::max)
            .unwrap_or(baseline)
            .ceil()
            .max(0.0) as u32
    }

    fn line_width(&self, line: &str) -> f32 {
        let scaled = self.face.as_scaled(self.scale());
        let mut width = 0.0f32;
        let mut previous = None;
        for ch in line.chars() {
            let glyph = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, glyph);
            }
            width += scaled.h_advance(glyph);
            previous = Some(glyph);
        }
        width
    }
}

impl Typeface for Font {
    fn label(&self) -> String {
        format!("{}@{}", self.path.display(), self.size)
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| self.line_width(line))
            .fold(0.0f32, f32::max)
            .ceil() as u32;
        let height = match lines.as_slice() {
            [line] => self.glyph_bottom(line),
            _ => {
                let count = lines.len() as u32;
                count * self.line_height() + (count - 1) * LINE_SPACING
            }
        };
        (width, height)
    }

    fn draw(&self, image: &mut RgbaImage, text: &str, x: i32, y: i32, color: Color) {
        let advance = (self.line_height() + LINE_SPACING) as i32;
        for (index, line) in text.split('\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            draw_text_mut(
                image,
                color.to_rgba(),
                x,
                y + index as i32 * advance,
                self.scale(),
                self.face.as_ref(),
                line,
            );
        }
    }
}

/// Font files read from a storage directory.
pub struct StorageFonts<'a> {
    storage: &'a dyn Storage,
    dir: PathBuf,
}

impl<'a> StorageFonts<'a> {
    /// Fonts under `dir`, filtered to font file extensions.
    pub fn new(storage: &'a dyn Storage, dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            dir: dir.into(),
        }
    }
}

impl FontCatalog for StorageFonts<'_> {
    fn fonts(&self, sizes: Range<u32>) -> Result<Vec<Box<dyn Typeface>>, SynthError> {
        let mut fonts: Vec<Box<dyn Typeface>> = Vec::new();
        for path in list_files(self.storage, &self.dir, &FileFilter::Fonts)? {
            let base = Font::load(self.storage, &path, sizes.start)?;
            for size in sizes.clone() {
                fonts.push(Box::new(base.with_size(size)));
            }
        }
        Ok(fonts)
    }
}
