//! Dataset generation: text drawn onto backgrounds.
//!
//! A [`Generator`] walks every combination of background, text file, font
//! size and color. Each text file is split into blocks, the blocks are packed
//! onto the background, and every packed block is drawn and annotated. With
//! augmentation enabled, each image is further expanded into its augmented
//! variants (see [`crate::augment`]).
//!
//! All reads and writes go through a [`Storage`]; label files are written
//! once, after the last image.

mod report;

pub use report::RunReport;

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::annotate::{CharSampling, RegionAccumulator};
use crate::augment::{
    validate_augmentation_params, AugmentationParams, AugmentationPlan, CombinationStart, Family,
};
use crate::error::SynthError;
use crate::ir::io_voc_xml::write_voc_annotations;
use crate::ir::Granularity;
use crate::layout::{create_rectangles, Canvas, PackingAlgorithm, RectanglePosition, ShelfPacker};
use crate::storage::{list_files, FileFilter, Storage};
use crate::style::{read_colors, Color, FontCatalog, Typeface};
use crate::text::segment;

/// Default image name prefix.
pub const DEFAULT_PREFIX: &str = "btfc";

/// When augmentation happens relative to drawing text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AugmentMode {
    /// No augmentation.
    #[default]
    None,
    /// Augment the raw background, then draw text onto every variant.
    BeforeText,
    /// Draw text once, then write augmented copies of the texted image.
    AfterText,
}

/// Augmentation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentationOptions {
    pub mode: AugmentMode,
    pub params: AugmentationParams,
    pub families: Vec<Family>,
    pub combination_start: CombinationStart,
}

impl Default for AugmentationOptions {
    fn default() -> Self {
        Self {
            mode: AugmentMode::None,
            params: AugmentationParams::default(),
            families: Family::STANDARD.to_vec(),
            combination_start: CombinationStart::default(),
        }
    }
}

/// Options for a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Font sizes `start..end` (end exclusive).
    pub font_sizes: (u32, u32),
    /// How text files are split into packed blocks.
    pub parse_mode: Granularity,
    /// Granularities recorded for every drawn block.
    pub annotation_modes: Vec<Granularity>,
    pub char_sampling: CharSampling,
    pub prefix: String,
    /// Seed for reproducible augmentation.
    pub seed: Option<u64>,
    pub augmentation: AugmentationOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            font_sizes: (30, 35),
            parse_mode: Granularity::Word,
            annotation_modes: vec![Granularity::Word],
            char_sampling: CharSampling::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            seed: None,
            augmentation: AugmentationOptions::default(),
        }
    }
}

/// Validate generation options without touching storage.
pub fn validate_generate_options(opts: &GenerateOptions) -> Result<(), SynthError> {
    if !opts.parse_mode.is_parse_mode() {
        return Err(SynthError::InvalidConfig {
            message: format!(
                "parse mode '{}' is not supported; use chars, words, sentences or paragraphs",
                opts.parse_mode
            ),
        });
    }

    let (start, end) = opts.font_sizes;
    if start == 0 || start >= end {
        return Err(SynthError::InvalidConfig {
            message: format!("font size range {start}..{end} must satisfy 0 < start < end"),
        });
    }

    if opts.annotation_modes.is_empty() {
        return Err(SynthError::InvalidConfig {
            message: "at least one annotation mode is required".to_string(),
        });
    }

    if opts.prefix.is_empty() || opts.prefix.contains(['/', '\\']) {
        return Err(SynthError::InvalidConfig {
            message: format!("invalid image name prefix '{}'", opts.prefix),
        });
    }

    if opts.augmentation.mode != AugmentMode::None {
        validate_augmentation_params(&opts.augmentation.params)?;
    }

    Ok(())
}

/// Where a run reads its inputs and writes its outputs.
pub struct Sources<'a> {
    pub storage: &'a dyn Storage,
    pub fonts: &'a dyn FontCatalog,
    /// Directory of background images.
    pub backgrounds: PathBuf,
    /// Directory of text files.
    pub texts: PathBuf,
    /// Color list file.
    pub colors: PathBuf,
    /// Output directory for images.
    pub images: PathBuf,
    /// Output directory for label files.
    pub annotations: PathBuf,
}

/// One image ready to be written.
#[derive(Clone, Debug)]
pub struct GeneratedImage {
    pub image: RgbaImage,
    pub format: ImageFormat,
    pub color: Color,
    pub font_label: String,
    pub filename: String,
}

struct Background {
    image: RgbaImage,
    format: ImageFormat,
}

/// Runs the background, text, font, color loop.
pub struct Generator<'a> {
    sources: Sources<'a>,
    options: GenerateOptions,
    accumulator: RegionAccumulator,
    rng: StdRng,
    run_stamp: String,
    sequence: u64,
    report: RunReport,
}

impl<'a> Generator<'a> {
    /// Validate `options` and prepare a run. No I/O happens here.
    pub fn new(sources: Sources<'a>, options: GenerateOptions) -> Result<Self, SynthError> {
        validate_generate_options(&options)?;

        let accumulator = RegionAccumulator::new(&options.annotation_modes)?
            .with_char_sampling(options.char_sampling);
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            sources,
            options,
            accumulator,
            rng,
            run_stamp: String::new(),
            sequence: 0,
            report: RunReport::default(),
        })
    }

    /// Generate every image, then write the label files.
    pub fn run(mut self) -> Result<RunReport, SynthError> {
        let storage = self.sources.storage;
        self.run_stamp = run_stamp()?;

        let colors = read_colors(storage, &self.sources.colors)?;
        let (start, end) = self.options.font_sizes;
        let fonts = self.sources.fonts.fonts(start..end)?;
        let backgrounds = list_files(storage, &self.sources.backgrounds, &FileFilter::Images)?;
        let texts = list_files(storage, &self.sources.texts, &FileFilter::Any)?;

        self.report.backgrounds = backgrounds.len();
        self.report.text_files = texts.len();
        self.report.fonts = fonts.len();
        self.report.colors = colors.len();
        info!(
            backgrounds = backgrounds.len(),
            texts = texts.len(),
            fonts = fonts.len(),
            colors = colors.len(),
            mode = ?self.options.augmentation.mode,
            "starting generation"
        );

        for background_path in &backgrounds {
            let background = load_background(storage, background_path)?;
            let (width, height) = background.image.dimensions();

            for text_path in &texts {
                let corpus = storage.read_to_string(text_path)?;
                let blocks = segment(&corpus, self.options.parse_mode, true);

                for font in &fonts {
                    let placements = place_blocks(&blocks, font.as_ref(), width, height);
                    debug!(
                        background = %background_path.display(),
                        text = %text_path.display(),
                        font = %font.label(),
                        packed = placements.len(),
                        dropped = blocks.len() - placements.len(),
                        "packed text blocks"
                    );
                    self.report.blocks_packed += placements.len();
                    self.report.blocks_dropped += blocks.len() - placements.len();

                    for color in &colors {
                        self.render(&background, &placements, font.as_ref(), *color)?;
                    }
                }
            }
        }

        let annotations = self.accumulator.annotations();
        self.report.annotation_files =
            write_voc_annotations(storage, &self.sources.annotations, annotations)?;
        for granularity in self.accumulator.modes() {
            self.report
                .regions
                .insert(*granularity, annotations.region_count(*granularity));
        }
        info!(
            images = self.report.images_written,
            variants = self.report.variants_written,
            annotation_files = self.report.annotation_files,
            "generation finished"
        );

        Ok(self.report)
    }

    fn render(
        &mut self,
        background: &Background,
        placements: &[RectanglePosition],
        font: &dyn Typeface,
        color: Color,
    ) -> Result<(), SynthError> {
        let format = background.format;

        match self.options.augmentation.mode {
            AugmentMode::None => {
                let generated =
                    self.draw_text(background.image.clone(), format, placements, font, color);
                self.save(generated)
            }
            AugmentMode::BeforeText => {
                let plan = self.plan(&background.image);
                for variant in plan.draws(&background.image) {
                    let generated = self.draw_text(variant, format, placements, font, color);
                    self.save(generated)?;
                }
                Ok(())
            }
            AugmentMode::AfterText => {
                let generated =
                    self.draw_text(background.image.clone(), format, placements, font, color);
                let plan = self.plan(&generated.image);
                for variant in plan.draws(&generated.image) {
                    let filename = self.next_filename(format);
                    self.write_image(&filename, variant, format)?;
                    self.report.variants_written += 1;
                }
                self.save(generated)
            }
        }
    }

    fn plan(&mut self, source: &RgbaImage) -> AugmentationPlan {
        let augmentation = &self.options.augmentation;
        AugmentationPlan::calculate(
            source.width(),
            source.height(),
            &augmentation.params,
            &augmentation.families,
            &mut self.rng,
        )
        .with_combination_start(augmentation.combination_start)
    }

    /// Draw every placed block onto `image` and record its regions.
    fn draw_text(
        &mut self,
        mut image: RgbaImage,
        format: ImageFormat,
        placements: &[RectanglePosition],
        font: &dyn Typeface,
        color: Color,
    ) -> GeneratedImage {
        let filename = self.next_filename(format);

        let mut drawn = false;
        for placement in placements {
            let Some(text) = placement.rectangle.text.as_deref() else {
                continue;
            };
            font.draw(
                &mut image,
                text,
                placement.x_left as i32,
                placement.y_top as i32,
                color,
            );
            self.accumulator.record_regions(
                &filename,
                text,
                i64::from(placement.x_left),
                i64::from(placement.y_top),
                font,
            );
            drawn = true;
        }
        if drawn {
            self.accumulator
                .set_image_size(&filename, image.width(), image.height());
        }

        GeneratedImage {
            image,
            format,
            color,
            font_label: font.label(),
            filename,
        }
    }

    fn save(&mut self, generated: GeneratedImage) -> Result<(), SynthError> {
        self.write_image(&generated.filename, generated.image, generated.format)?;
        info!(
            file = %generated.filename,
            font = %generated.font_label,
            color = %generated.color,
            "wrote image"
        );
        self.report.images_written += 1;
        Ok(())
    }

    fn write_image(
        &self,
        filename: &str,
        image: RgbaImage,
        format: ImageFormat,
    ) -> Result<(), SynthError> {
        let path = self.sources.images.join(filename);
        let bytes = encode_image(image, format, &path)?;
        self.sources.storage.write(&path, &bytes)
    }

    fn next_filename(&mut self, format: ImageFormat) -> String {
        self.sequence += 1;
        let extension = format.extensions_str().first().copied().unwrap_or("png");
        format!(
            "{}-{}-{:06}.{}",
            self.options.prefix, self.run_stamp, self.sequence, extension
        )
    }
}

/// Measure every block and pack the results onto a `width` x `height` canvas.
pub fn place_blocks(
    blocks: &[&str],
    font: &dyn Typeface,
    width: u32,
    height: u32,
) -> Vec<RectanglePosition> {
    let sized: Vec<(u32, u32, Option<&str>)> = blocks
        .iter()
        .map(|block| {
            let (w, h) = font.measure(block);
            (w, h, Some(*block))
        })
        .collect();
    ShelfPacker.pack(&Canvas::new(width, height), create_rectangles(&sized))
}

/// Encode `image` in `format`, dropping alpha where the format has none.
pub fn encode_image(
    image: RgbaImage,
    format: ImageFormat,
    path: &Path,
) -> Result<Vec<u8>, SynthError> {
    let dynamic = match format {
        ImageFormat::Jpeg | ImageFormat::Pnm => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(image),
    };

    let mut bytes = Vec::new();
    dynamic
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|source| SynthError::ImageEncode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(bytes)
}

fn load_background(storage: &dyn Storage, path: &Path) -> Result<Background, SynthError> {
    let format = ImageFormat::from_path(path).map_err(|source| SynthError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = storage.read(path)?;
    let image = image::load_from_memory_with_format(&bytes, format)
        .map_err(|source| SynthError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    Ok(Background { image, format })
}

fn run_stamp() -> Result<String, SynthError> {
    OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]T[hour][minute][second]"))
        .map_err(|err| SynthError::Io(io::Error::other(err)))
}
