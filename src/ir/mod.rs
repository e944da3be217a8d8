//! Annotation model shared by the generator, the label writer and the
//! restore pass.
//!
//! Regions are plain pixel-space boxes (`x_left, y_top, x_right, y_bottom`)
//! grouped per image and per [`Granularity`]. Construction is permissive:
//! a box may extend past the canvas or above it, since text blocks are
//! anchored to a shared baseline.
//!
//! # Example
//!
//! ```
//! use ocr_synth::ir::{AnnotationSet, Granularity, RegionPosition};
//!
//! let mut annotations = AnnotationSet::new();
//! annotations.record(
//!     "btfc-0001.png",
//!     Granularity::Word,
//!     "hello ",
//!     RegionPosition::new(0, 0, 42, 18),
//! );
//! assert_eq!(annotations.region_count(Granularity::Word), 1);
//! ```

mod annotation;
mod granularity;
pub mod io_voc_xml;
mod region;

pub use annotation::{AnnotationSet, ImageAnnotation};
pub use granularity::Granularity;
pub use region::{Region, RegionPosition};
