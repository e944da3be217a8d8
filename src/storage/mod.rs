//! Byte storage used by every reader and writer.
//!
//! The generator never touches the filesystem directly; it goes through a
//! [`Storage`] implementation. [`LocalStorage`] works on the local filesystem
//! and [`MemoryStorage`] keeps everything in process, which is handy for dry
//! runs and tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SynthError;

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// File identifier listing, reading and writing.
pub trait Storage {
    /// List the files directly under `path`, sorted by name.
    ///
    /// If `path` is itself a file, the result is just that file.
    fn list(&self, path: &Path) -> Result<Vec<PathBuf>, SynthError>;

    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, SynthError>;

    /// Write `bytes` to `path`, creating parent directories as needed.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SynthError>;

    /// Number of files directly under `path` (1 for a file).
    fn count(&self, path: &Path) -> Result<usize, SynthError> {
        Ok(self.list(path)?.len())
    }

    /// Read the file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String, SynthError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|source| {
            SynthError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8: {source}", path.display()),
            ))
        })
    }
}

/// Filesystem-backed storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn list(&self, path: &Path) -> Result<Vec<PathBuf>, SynthError> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| {
                SynthError::Io(source.into_io_error().unwrap_or_else(|| {
                    io::Error::other(format!("failed to list {}", path.display()))
                }))
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, SynthError> {
        fs::read(path).map_err(SynthError::Io)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SynthError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SynthError::Io)?;
        }
        fs::write(path, bytes).map_err(SynthError::Io)
    }
}

/// In-process storage keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, replacing any previous content.
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), bytes.into());
    }

    /// All stored paths in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl Storage for MemoryStorage {
    fn list(&self, path: &Path) -> Result<Vec<PathBuf>, SynthError> {
        let files = self.files.borrow();
        if files.contains_key(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        Ok(files
            .keys()
            .filter(|candidate| candidate.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, SynthError> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            SynthError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found in memory storage", path.display()),
            ))
        })
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SynthError> {
        self.insert(path, bytes);
        Ok(())
    }
}

/// Decides which listed files a reader consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FileFilter {
    /// Accept every file.
    #[default]
    Any,
    /// Files whose extension maps to a known raster image format.
    Images,
    /// TrueType/OpenType font files.
    Fonts,
    /// Files with one of the given extensions (case-insensitive, no dot).
    Extensions(Vec<String>),
}

impl FileFilter {
    /// Returns true if `path` should be read.
    pub fn accepts(&self, path: &Path) -> bool {
        match self {
            FileFilter::Any => true,
            FileFilter::Images => image::ImageFormat::from_path(path).is_ok(),
            FileFilter::Fonts => has_extension(path, &FONT_EXTENSIONS),
            FileFilter::Extensions(extensions) => has_extension(path, extensions),
        }
    }
}

/// List files under `dir` accepted by `filter`, in storage order.
pub fn list_files(
    storage: &dyn Storage,
    dir: &Path,
    filter: &FileFilter,
) -> Result<Vec<PathBuf>, SynthError> {
    Ok(storage
        .list(dir)?
        .into_iter()
        .filter(|path| filter.accepts(path))
        .collect())
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate.as_ref()))
        })
        .unwrap_or(false)
}
