//! Draw annotated regions back onto their images.
//!
//! Useful to eyeball a generated dataset: every label file under the
//! annotation directory is parsed, the image it names is loaded, and each
//! region is outlined in a color that identifies its granularity.

use std::path::PathBuf;

use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;
use tracing::info;

use crate::error::SynthError;
use crate::generate::encode_image;
use crate::ir::io_voc_xml::{read_voc_annotation, VOC_XML_EXTENSION};
use crate::ir::{Granularity, ImageAnnotation};
use crate::storage::{list_files, FileFilter, Storage};

/// Input and output directories of a restore pass.
#[derive(Clone, Debug)]
pub struct RestoreDirs {
    pub annotations: PathBuf,
    pub images: PathBuf,
    pub output: PathBuf,
}

/// Counters for one restore pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub images_restored: usize,
    pub regions_drawn: usize,
}

/// Outline color of a granularity.
pub fn outline_color(granularity: Granularity) -> Rgba<u8> {
    match granularity {
        Granularity::Character => Rgba([255, 0, 0, 255]),
        Granularity::Word => Rgba([0, 200, 0, 255]),
        Granularity::Sentence => Rgba([0, 0, 255, 255]),
        Granularity::Paragraph => Rgba([255, 200, 0, 255]),
        Granularity::Article => Rgba([200, 0, 200, 255]),
    }
}

/// Outline every region of every label file under `dirs.annotations`.
///
/// The first unparseable label file aborts the pass with
/// [`SynthError::VocXmlParse`], and a label file whose image is missing with
/// [`SynthError::MissingImage`].
pub fn restore_regions(
    storage: &dyn Storage,
    dirs: &RestoreDirs,
) -> Result<RestoreReport, SynthError> {
    let filter = FileFilter::Extensions(vec![VOC_XML_EXTENSION.to_string()]);
    let mut report = RestoreReport::default();

    for xml_path in list_files(storage, &dirs.annotations, &filter)? {
        let document = read_voc_annotation(storage, &xml_path)?;

        let image_path = dirs.images.join(&document.filename);
        let bytes = storage
            .read(&image_path)
            .map_err(|_| SynthError::MissingImage {
                annotation: xml_path.clone(),
                path: image_path.clone(),
            })?;
        let format = ImageFormat::from_path(&image_path).map_err(|source| {
            SynthError::ImageDecode {
                path: image_path.clone(),
                source,
            }
        })?;
        let mut image = image::load_from_memory_with_format(&bytes, format)
            .map_err(|source| SynthError::ImageDecode {
                path: image_path.clone(),
                source,
            })?
            .to_rgba8();

        report.regions_drawn += outline_regions(&mut image, &document.annotation);

        let output_path = dirs.output.join(&document.filename);
        let encoded = encode_image(image, format, &output_path)?;
        storage.write(&output_path, &encoded)?;
        info!(file = %output_path.display(), "restored regions");
        report.images_restored += 1;
    }

    Ok(report)
}

/// Draw the outline of every region; returns how many were drawn.
///
/// Regions with no positive area are skipped.
pub fn outline_regions(image: &mut RgbaImage, annotation: &ImageAnnotation) -> usize {
    let mut drawn = 0;
    for (granularity, region) in annotation.iter() {
        let position = &region.position;
        let (Ok(width), Ok(height)) = (
            u32::try_from(position.width()),
            u32::try_from(position.height()),
        ) else {
            continue;
        };
        if width == 0 || height == 0 {
            continue;
        }
        let (Ok(x), Ok(y)) = (
            i32::try_from(position.x_left),
            i32::try_from(position.y_top),
        ) else {
            continue;
        };

        draw_hollow_rect_mut(
            image,
            Rect::at(x, y).of_size(width, height),
            outline_color(granularity),
        );
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_voc_xml::write_voc_annotations;
    use crate::ir::{AnnotationSet, RegionPosition};
    use crate::storage::MemoryStorage;
    use std::path::Path;

    fn dirs() -> RestoreDirs {
        RestoreDirs {
            annotations: PathBuf::from("out/annotations"),
            images: PathBuf::from("out/images"),
            output: PathBuf::from("out/restored"),
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_image(
            RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            ImageFormat::Png,
            Path::new("bg.png"),
        )
        .unwrap()
    }

    #[test]
    fn outlines_regions_in_granularity_colors() {
        let storage = MemoryStorage::new();
        storage.insert("out/images/a.png", png(20, 20));

        let mut set = AnnotationSet::new();
        set.record("a.png", Granularity::Word, "ab", RegionPosition::new(2, 2, 10, 8));
        set.record("a.png", Granularity::Character, "a", RegionPosition::new(3, 3, 3, 3));
        write_voc_annotations(&storage, Path::new("out/annotations"), &set).unwrap();

        let report = restore_regions(&storage, &dirs()).unwrap();
        assert_eq!(report.images_restored, 1);
        assert_eq!(report.regions_drawn, 1);

        let restored = image::load_from_memory(
            &storage.read(Path::new("out/restored/a.png")).unwrap(),
        )
        .unwrap()
        .to_rgba8();
        assert_eq!(*restored.get_pixel(2, 2), outline_color(Granularity::Word));
        assert_eq!(*restored.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn missing_image_is_an_error() {
        let storage = MemoryStorage::new();
        let mut set = AnnotationSet::new();
        set.record("gone.png", Granularity::Word, "x", RegionPosition::new(0, 0, 1, 1));
        write_voc_annotations(&storage, Path::new("out/annotations"), &set).unwrap();

        assert!(matches!(
            restore_regions(&storage, &dirs()),
            Err(SynthError::MissingImage { .. })
        ));
    }

    #[test]
    fn unreadable_label_file_aborts_the_pass() {
        let storage = MemoryStorage::new();
        storage.insert("out/images/a.png", png(20, 20));
        storage.insert("out/annotations/broken.xml", "<annotation>");

        let err = restore_regions(&storage, &dirs()).unwrap_err();
        match err {
            SynthError::VocXmlParse { path, .. } => {
                assert_eq!(path, PathBuf::from("out/annotations/broken.xml"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(storage.paths().iter().all(|p| !p.starts_with("out/restored")));
    }
}
