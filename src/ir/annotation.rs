//! Per-image annotation collections.
//!
//! An [`AnnotationSet`] maps image filenames to [`ImageAnnotation`]s. Each
//! image annotation holds one append-only, ordered collection of regions per
//! [`Granularity`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::granularity::Granularity;
use super::region::{Region, RegionPosition};

/// All regions recorded for one image, one ordered collection per granularity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnnotation {
    /// Canvas size, when known, for the label file header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<(u32, u32)>,

    #[serde(default)]
    pub char_regions: Vec<Region>,

    #[serde(default)]
    pub word_regions: Vec<Region>,

    #[serde(default)]
    pub sentence_regions: Vec<Region>,

    #[serde(default)]
    pub paragraph_regions: Vec<Region>,

    #[serde(default)]
    pub article_regions: Vec<Region>,
}

impl ImageAnnotation {
    /// Returns the regions recorded at `granularity`, in write order.
    pub fn regions(&self, granularity: Granularity) -> &[Region] {
        match granularity {
            Granularity::Character => &self.char_regions,
            Granularity::Word => &self.word_regions,
            Granularity::Sentence => &self.sentence_regions,
            Granularity::Paragraph => &self.paragraph_regions,
            Granularity::Article => &self.article_regions,
        }
    }

    /// Append a region to the collection for `granularity`.
    pub fn push(&mut self, granularity: Granularity, region: Region) {
        let regions = match granularity {
            Granularity::Character => &mut self.char_regions,
            Granularity::Word => &mut self.word_regions,
            Granularity::Sentence => &mut self.sentence_regions,
            Granularity::Paragraph => &mut self.paragraph_regions,
            Granularity::Article => &mut self.article_regions,
        };
        regions.push(region);
    }

    /// Total number of regions across all granularities.
    pub fn len(&self) -> usize {
        Granularity::ALL
            .iter()
            .map(|granularity| self.regions(*granularity).len())
            .sum()
    }

    /// Returns true if no region has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(granularity, region)` pairs in label file order
    /// (characters first, articles last).
    pub fn iter(&self) -> impl Iterator<Item = (Granularity, &Region)> {
        Granularity::ALL.into_iter().flat_map(move |granularity| {
            self.regions(granularity)
                .iter()
                .map(move |region| (granularity, region))
        })
    }
}

/// Annotations for every image of a run, keyed by image filename.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    images: BTreeMap<String, ImageAnnotation>,
}

impl AnnotationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region for `image_id`, creating the image entry on first use.
    ///
    /// This is the only way regions enter the set.
    pub fn record(
        &mut self,
        image_id: &str,
        granularity: Granularity,
        text: &str,
        position: RegionPosition,
    ) {
        self.entry(image_id)
            .push(granularity, Region::new(position, text));
    }

    /// Record the canvas size of `image_id`, creating the entry if needed.
    pub fn set_size(&mut self, image_id: &str, width: u32, height: u32) {
        self.entry(image_id).size = Some((width, height));
    }

    /// Insert a fully built annotation, replacing any previous one.
    pub fn insert(&mut self, image_id: impl Into<String>, annotation: ImageAnnotation) {
        self.images.insert(image_id.into(), annotation);
    }

    /// Returns the annotation for `image_id`, if any region was recorded.
    pub fn get(&self, image_id: &str) -> Option<&ImageAnnotation> {
        self.images.get(image_id)
    }

    /// Iterate images in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageAnnotation)> {
        self.images
            .iter()
            .map(|(name, annotation)| (name.as_str(), annotation))
    }

    /// Number of annotated images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if no image has been annotated.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of regions recorded at `granularity` across all images.
    pub fn region_count(&self, granularity: Granularity) -> usize {
        self.images
            .values()
            .map(|annotation| annotation.regions(granularity).len())
            .sum()
    }

    fn entry(&mut self, image_id: &str) -> &mut ImageAnnotation {
        self.images.entry(image_id.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_creates_image_on_first_use_and_appends_in_order() {
        let mut set = AnnotationSet::new();
        set.record("a.png", Granularity::Word, "AB ", RegionPosition::new(0, 0, 10, 5));
        set.record("a.png", Granularity::Word, "CD", RegionPosition::new(10, 0, 20, 5));
        set.record("b.png", Granularity::Character, "x", RegionPosition::new(0, 0, 1, 1));

        assert_eq!(set.len(), 2);
        let words = set.get("a.png").unwrap().regions(Granularity::Word);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text.as_deref(), Some("AB "));
        assert_eq!(words[1].position.x_left, 10);
        assert_eq!(set.region_count(Granularity::Character), 1);
    }

    #[test]
    fn iter_yields_fine_granularities_first() {
        let mut annotation = ImageAnnotation::default();
        annotation.push(
            Granularity::Article,
            Region::unlabeled(RegionPosition::new(0, 0, 9, 9)),
        );
        annotation.push(
            Granularity::Character,
            Region::unlabeled(RegionPosition::new(0, 0, 1, 1)),
        );

        let order: Vec<Granularity> = annotation.iter().map(|(g, _)| g).collect();
        assert_eq!(order, vec![Granularity::Character, Granularity::Article]);
        assert_eq!(annotation.len(), 2);
    }

    #[test]
    fn missing_image_is_none() {
        let set = AnnotationSet::new();
        assert!(set.get("nope.png").is_none());
        assert!(set.is_empty());
    }
}
