//! ocr-synth: synthetic labeled text images for OCR datasets.
//!
//! Text corpora are split into blocks, packed onto background images, drawn
//! with every configured font, size and color, and annotated with one
//! bounding box per character, word, sentence, paragraph or whole text. The
//! annotations are written as Pascal VOC XML.
//!
//! # Modules
//!
//! - [`layout`]: shelf rectangle packing
//! - [`text`]: text segmentation at each granularity
//! - [`annotate`]: region accumulation for drawn text
//! - [`augment`]: augmentation figures and powerset enumeration
//! - [`generate`]: the generation orchestrator
//! - [`restore`]: drawing label files back onto their images
//! - [`ir`]: annotation types and the VOC XML reader/writer
//! - [`storage`], [`style`]: input/output adapters
//! - [`error`]: error types for ocr-synth operations

pub mod annotate;
pub mod augment;
pub mod error;
pub mod generate;
pub mod ir;
pub mod layout;
pub mod logging;
pub mod restore;
pub mod storage;
pub mod style;
pub mod text;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use error::SynthError;

use annotate::CharSampling;
use augment::{AugmentationParams, CombinationStart, Family};
use generate::{AugmentMode, AugmentationOptions, GenerateOptions, Generator, Sources};
use ir::Granularity;
use restore::RestoreDirs;
use storage::LocalStorage;
use style::StorageFonts;

/// The ocr-synth CLI application.
#[derive(Parser)]
#[command(name = "ocr-synth")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug events (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Draw text onto backgrounds and write images with VOC annotations.
    Generate(GenerateArgs),
    /// Outline annotated regions on generated images.
    Restore(RestoreArgs),
}

/// Arguments for the generate subcommand.
#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory of background images.
    #[arg(long, env = "OCR_SYNTH_BACKGROUNDS")]
    backgrounds: PathBuf,

    /// Directory of UTF-8 text files.
    #[arg(long, env = "OCR_SYNTH_TEXTS")]
    texts: PathBuf,

    /// Directory of .ttf/.otf fonts.
    #[arg(long, env = "OCR_SYNTH_FONTS")]
    fonts: PathBuf,

    /// File with one 'r,g,b' color per line.
    #[arg(long, env = "OCR_SYNTH_COLORS")]
    colors: PathBuf,

    /// Output directory for generated images.
    #[arg(long, env = "OCR_SYNTH_IMAGES")]
    images: PathBuf,

    /// Output directory for VOC XML label files.
    #[arg(long, env = "OCR_SYNTH_ANNOTATIONS")]
    annotations: PathBuf,

    /// Smallest font size in pixels.
    #[arg(long, default_value_t = 30)]
    font_size_start: u32,

    /// Font size upper bound (exclusive).
    #[arg(long, default_value_t = 35)]
    font_size_end: u32,

    /// How text files are split into packed blocks ('chars', 'words',
    /// 'sentences' or 'paragraphs').
    #[arg(long, default_value = "words")]
    parse_mode: Granularity,

    /// Granularities to annotate, comma-separated ('chars', 'words',
    /// 'sentences', 'paragraphs', 'text').
    #[arg(long = "annotation-mode", default_value = "words", value_delimiter = ',')]
    annotation_modes: Vec<Granularity>,

    /// Character regions to record.
    #[arg(long, value_enum, default_value_t = CharSamplingArg::EveryOther)]
    char_sampling: CharSamplingArg,

    /// Image filename prefix.
    #[arg(long, default_value = generate::DEFAULT_PREFIX)]
    prefix: String,

    /// Random seed for reproducible augmentation.
    #[arg(long, env = "OCR_SYNTH_SEED")]
    seed: Option<u64>,

    /// When to augment relative to drawing text.
    #[arg(long, value_enum, default_value_t = AugmentArg::None)]
    augment: AugmentArg,

    /// Maximum rotation in degrees (reserved).
    #[arg(long, default_value_t = 1)]
    aug_max_rotation: u32,

    /// Maximum outline thickness of augmentation shapes.
    #[arg(long, default_value_t = 1)]
    aug_line_thickness: u32,

    /// Maximum diameter of augmentation shapes.
    #[arg(long, default_value_t = 400)]
    aug_diameter: u32,

    /// Figures per augmentation family.
    #[arg(long, default_value_t = 1)]
    aug_options: u32,

    /// Extra points added with the shapes.
    #[arg(long, default_value_t = 1)]
    aug_points: u32,

    /// Also add translucent glare ellipses.
    #[arg(long)]
    aug_glare: bool,

    /// Skip single-figure subsets in the combination phase.
    #[arg(long)]
    aug_pairs_only: bool,

    /// Output format for the run report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the restore subcommand.
#[derive(clap::Args)]
struct RestoreArgs {
    /// Directory of VOC XML label files.
    #[arg(long, env = "OCR_SYNTH_ANNOTATIONS")]
    annotations: PathBuf,

    /// Directory of the images the label files refer to.
    #[arg(long, env = "OCR_SYNTH_IMAGES")]
    images: PathBuf,

    /// Output directory for outlined images.
    #[arg(long)]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CharSamplingArg {
    EveryOther,
    All,
}

impl From<CharSamplingArg> for CharSampling {
    fn from(value: CharSamplingArg) -> Self {
        match value {
            CharSamplingArg::EveryOther => CharSampling::EveryOther,
            CharSamplingArg::All => CharSampling::All,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AugmentArg {
    None,
    BeforeText,
    AfterText,
}

impl From<AugmentArg> for AugmentMode {
    fn from(value: AugmentArg) -> Self {
        match value {
            AugmentArg::None => AugmentMode::None,
            AugmentArg::BeforeText => AugmentMode::BeforeText,
            AugmentArg::AfterText => AugmentMode::AfterText,
        }
    }
}

/// Run the ocr-synth CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SynthError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Restore(args)) => run_restore(args),
        None => {
            println!("ocr-synth {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Synthetic labeled text images for OCR datasets.");
            println!();
            println!("Run 'ocr-synth --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the generate subcommand.
fn run_generate(args: GenerateArgs) -> Result<(), SynthError> {
    let json = match args.output.as_str() {
        "json" => true,
        "text" => false,
        other => {
            return Err(SynthError::InvalidConfig {
                message: format!("unsupported report output '{other}' (supported: text, json)"),
            });
        }
    };

    let mut families = Family::STANDARD.to_vec();
    if args.aug_glare {
        families.push(Family::Glare);
    }
    let options = GenerateOptions {
        font_sizes: (args.font_size_start, args.font_size_end),
        parse_mode: args.parse_mode,
        annotation_modes: args.annotation_modes,
        char_sampling: args.char_sampling.into(),
        prefix: args.prefix,
        seed: args.seed,
        augmentation: AugmentationOptions {
            mode: args.augment.into(),
            params: AugmentationParams {
                max_rotation_degrees: args.aug_max_rotation,
                max_line_thickness: args.aug_line_thickness,
                max_diameter: args.aug_diameter,
                options_per_family: args.aug_options,
                extra_points: args.aug_points,
            },
            families,
            combination_start: if args.aug_pairs_only {
                CombinationStart::Pairs
            } else {
                CombinationStart::Singles
            },
        },
    };

    let storage = LocalStorage;
    let fonts = StorageFonts::new(&storage, &args.fonts);
    let sources = Sources {
        storage: &storage,
        fonts: &fonts,
        backgrounds: args.backgrounds,
        texts: args.texts,
        colors: args.colors,
        images: args.images,
        annotations: args.annotations,
    };

    let report = Generator::new(sources, options)?.run()?;
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Execute the restore subcommand.
fn run_restore(args: RestoreArgs) -> Result<(), SynthError> {
    let dirs = RestoreDirs {
        annotations: args.annotations,
        images: args.images,
        output: args.output,
    };
    let report = restore::restore_regions(&LocalStorage, &dirs)?;

    println!(
        "Restored {} image(s), {} region(s) drawn",
        report.images_restored, report.regions_drawn
    );
    Ok(())
}
