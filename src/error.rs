use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ocr-synth operations.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown granularity '{0}' (supported: chars, words, sentences, paragraphs, text)")]
    UnknownGranularity(String),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Invalid color in {path} at line {line}: {message}")]
    ColorParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to serialize run report as JSON: {source}")]
    ReportJsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Image referenced by annotation {annotation} not found: {path}")]
    MissingImage { annotation: PathBuf, path: PathBuf },
}
