//! Pascal VOC XML reader and writer for region annotations.
//!
//! One XML file is written per image. Every region becomes an `<object>` whose
//! `<name>` is the granularity tag (`symbol`, `word`, `line`, `paragraph`,
//! `artikle`); the region text itself is not stored.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::annotation::{AnnotationSet, ImageAnnotation};
use super::granularity::Granularity;
use super::region::{Region, RegionPosition};
use crate::error::SynthError;
use crate::storage::{list_files, FileFilter, Storage};

pub const VOC_XML_EXTENSION: &str = "xml";
const MEMORY_PATH: &str = "<memory>";

/// A parsed label file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocDocument {
    pub folder: Option<String>,
    pub filename: String,
    pub annotation: ImageAnnotation,
}

/// Path of the label file for `image_name` inside `dir`.
pub fn annotation_path(dir: &Path, image_name: &str) -> PathBuf {
    dir.join(format!("{image_name}.{VOC_XML_EXTENSION}"))
}

/// Write one label file per annotated image under `dir`.
///
/// Returns the number of files written.
pub fn write_voc_annotations(
    storage: &dyn Storage,
    dir: &Path,
    annotations: &AnnotationSet,
) -> Result<usize, SynthError> {
    let folder = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut written = 0;
    for (image_name, annotation) in annotations.iter() {
        let xml = to_voc_xml_string(&folder, image_name, annotation);
        storage.write(&annotation_path(dir, image_name), xml.as_bytes())?;
        written += 1;
    }
    Ok(written)
}

/// Render the label file of one image.
pub fn to_voc_xml_string(folder: &str, image_name: &str, annotation: &ImageAnnotation) -> String {
    let mut xml = String::new();

    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(xml, "  <folder>{}</folder>", xml_escape(folder)).expect("write to string");
    writeln!(xml, "  <filename>{}</filename>", xml_escape(image_name)).expect("write to string");
    writeln!(xml, "  <size>").expect("write to string");
    match annotation.size {
        Some((width, height)) => {
            writeln!(xml, "    <width>{width}</width>").expect("write to string");
            writeln!(xml, "    <height>{height}</height>").expect("write to string");
        }
        None => {
            writeln!(xml, "    <width></width>").expect("write to string");
            writeln!(xml, "    <height></height>").expect("write to string");
        }
    }
    writeln!(xml, "    <depth></depth>").expect("write to string");
    writeln!(xml, "  </size>").expect("write to string");

    for (granularity, region) in annotation.iter() {
        let position = &region.position;
        writeln!(xml, "  <object>").expect("write to string");
        writeln!(xml, "    <name>{}</name>", granularity.voc_tag()).expect("write to string");
        writeln!(xml, "    <pose>Unspecified</pose>").expect("write to string");
        writeln!(xml, "    <truncated>0</truncated>").expect("write to string");
        writeln!(xml, "    <occluded>0</occluded>").expect("write to string");
        writeln!(xml, "    <difficult>0</difficult>").expect("write to string");
        writeln!(xml, "    <bndbox>").expect("write to string");
        writeln!(xml, "      <xmin>{}</xmin>", position.x_left).expect("write to string");
        writeln!(xml, "      <ymin>{}</ymin>", position.y_top).expect("write to string");
        writeln!(xml, "      <xmax>{}</xmax>", position.x_right).expect("write to string");
        writeln!(xml, "      <ymax>{}</ymax>", position.y_bottom).expect("write to string");
        writeln!(xml, "    </bndbox>").expect("write to string");
        writeln!(xml, "  </object>").expect("write to string");
    }

    writeln!(xml, "</annotation>").expect("write to string");
    xml
}

/// Read one label file through `storage`.
pub fn read_voc_annotation(storage: &dyn Storage, path: &Path) -> Result<VocDocument, SynthError> {
    let xml = storage.read_to_string(path)?;
    parse_voc_xml_str(&xml, path)
}

/// Read every `*.xml` label file under `dir`, keyed by the image filename.
pub fn read_voc_dir(storage: &dyn Storage, dir: &Path) -> Result<AnnotationSet, SynthError> {
    let filter = FileFilter::Extensions(vec![VOC_XML_EXTENSION.to_string()]);
    let mut annotations = AnnotationSet::new();
    for path in list_files(storage, dir, &filter)? {
        let document = read_voc_annotation(storage, &path)?;
        annotations.insert(document.filename, document.annotation);
    }
    Ok(annotations)
}

/// Parse VOC XML from a UTF-8 string.
pub fn from_voc_xml_str(xml: &str) -> Result<VocDocument, SynthError> {
    parse_voc_xml_str(xml, Path::new(MEMORY_PATH))
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<VocDocument, SynthError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| SynthError::VocXmlParse {
        path: PathBuf::from(MEMORY_PATH),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocDocument, SynthError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let root = document.root_element();
    if root.tag_name().name() != "annotation" {
        return Err(SynthError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let folder = optional_child_text(root, "folder");
    let filename = required_child_text(root, "filename", path, "<annotation>")?;

    let mut annotation = ImageAnnotation::default();
    if let Some(size) = child_element(root, "size") {
        let width = parse_optional_u32(size, "width", path)?;
        let height = parse_optional_u32(size, "height", path)?;
        if let (Some(width), Some(height)) = (width, height) {
            annotation.size = Some((width, height));
        }
    }

    for object in root
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let granularity =
            Granularity::from_voc_tag(&name).ok_or_else(|| SynthError::VocXmlParse {
                path: path.to_path_buf(),
                message: format!("unknown object name '{name}'"),
            })?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        let position = RegionPosition::new(
            parse_required_i64(bndbox, "xmin", path)?,
            parse_required_i64(bndbox, "ymin", path)?,
            parse_required_i64(bndbox, "xmax", path)?,
            parse_required_i64(bndbox, "ymax", path)?,
        );
        annotation.push(granularity, Region::unlabeled(position));
    }

    Ok(VocDocument {
        folder,
        filename,
        annotation,
    })
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, SynthError> {
    child_element(node, tag).ok_or_else(|| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, SynthError> {
    optional_child_text(node, tag).ok_or_else(|| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required_i64(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<i64, SynthError> {
    let raw = required_child_text(node, tag, path, "<bndbox>")?;
    raw.parse::<i64>().map_err(|_| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in <bndbox>; expected integer"),
    })
}

fn parse_optional_u32(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
) -> Result<Option<u32>, SynthError> {
    optional_child_text(node, tag)
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| SynthError::VocXmlParse {
                path: path.to_path_buf(),
                message: format!("invalid <{tag}> value '{raw}' in <size>; expected u32"),
            })
        })
        .transpose()
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
