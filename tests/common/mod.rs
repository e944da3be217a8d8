#![allow(dead_code)]

use std::ops::Range;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use ocr_synth::error::SynthError;
use ocr_synth::generate::encode_image;
use ocr_synth::storage::MemoryStorage;
use ocr_synth::style::{Color, FontCatalog, Typeface, LINE_SPACING};

/// Every code point is a `8 * scale` wide, `12 * scale` tall block.
pub struct BlockFace {
    pub scale: u32,
}

impl BlockFace {
    pub fn char_width(&self) -> u32 {
        8 * self.scale
    }

    pub fn line_height(&self) -> u32 {
        12 * self.scale
    }
}

impl Typeface for BlockFace {
    fn label(&self) -> String {
        format!("block@{}", self.scale)
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| line.chars().count() as u32 * self.char_width())
            .max()
            .unwrap_or(0);
        let count = lines.len() as u32;
        (width, count * self.line_height() + (count - 1) * LINE_SPACING)
    }

    fn draw(&self, image: &mut RgbaImage, text: &str, x: i32, y: i32, color: Color) {
        let advance = (self.line_height() + LINE_SPACING) as i32;
        for (row, line) in text.split('\n').enumerate() {
            let top = y + row as i32 * advance;
            for (column, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let left = x + column as i32 * self.char_width() as i32;
                fill(image, left, top, self.char_width(), self.line_height(), color);
            }
        }
    }
}

fn fill(image: &mut RgbaImage, left: i32, top: i32, width: u32, height: u32, color: Color) {
    for dy in 0..height as i32 {
        for dx in 0..width as i32 {
            let (px, py) = (left + dx, top + dy);
            if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                image.put_pixel(px as u32, py as u32, color.to_rgba());
            }
        }
    }
}

/// One [`BlockFace`] per size.
pub struct BlockFonts;

impl FontCatalog for BlockFonts {
    fn fonts(&self, sizes: Range<u32>) -> Result<Vec<Box<dyn Typeface>>, SynthError> {
        Ok(sizes
            .map(|scale| Box::new(BlockFace { scale }) as Box<dyn Typeface>)
            .collect())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(
        RgbaImage::from_pixel(width, height, Rgba([240, 240, 240, 255])),
        ImageFormat::Png,
        Path::new("background.png"),
    )
    .expect("encode png")
}

/// Inputs under `in/`: one background, one text file, the given colors.
pub fn seed_inputs(storage: &MemoryStorage, background: (u32, u32), text: &str, colors: &str) {
    storage.insert(
        "in/backgrounds/bg.png",
        png_bytes(background.0, background.1),
    );
    storage.insert("in/backgrounds/notes.txt", "not an image");
    storage.insert("in/texts/a.txt", text);
    storage.insert("in/colors.txt", colors);
}

pub fn files_under(storage: &MemoryStorage, dir: &str) -> Vec<String> {
    storage
        .paths()
        .into_iter()
        .filter(|path| path.parent() == Some(Path::new(dir)))
        .map(|path| path.to_string_lossy().into_owned())
        .collect()
}
