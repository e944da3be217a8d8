//! Augmentation powerset enumeration.
//!
//! An [`AugmentationPlan`] draws a list of random [`Figure`]s for one source
//! image and then yields the source with each figure applied alone, followed
//! by the source with every combination of figures applied together.
//!
//! The number of produced images grows as `2^n` in the number of figures, so
//! keep `options_per_family` and `extra_points` small.

mod figure;

pub use figure::{Figure, FigureBounds, FigureKind};

use image::RgbaImage;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::SynthError;

/// Augmentation family, in application order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    /// Reserved; produces no figures.
    Rotate,
    /// Random lines, ellipses and rectangles plus extra points.
    NewElements,
    /// Translucent white ellipses.
    Glare,
    /// One Gaussian blur.
    Defocus,
    /// Downscaling to a random smaller size.
    Compression,
}

impl Family {
    /// Families enabled unless configured otherwise.
    pub const STANDARD: [Family; 3] = [Family::NewElements, Family::Defocus, Family::Compression];
}

/// Tunables for figure generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentationParams {
    /// Accepted for compatibility; no rotation figure is generated.
    pub max_rotation_degrees: u32,
    pub max_line_thickness: u32,
    pub max_diameter: u32,
    /// Figures per family for shapes, glare and resampling.
    pub options_per_family: u32,
    /// Points added on top of the `NewElements` shapes.
    pub extra_points: u32,
}

impl Default for AugmentationParams {
    fn default() -> Self {
        Self {
            max_rotation_degrees: 1,
            max_line_thickness: 1,
            max_diameter: 400,
            options_per_family: 1,
            extra_points: 1,
        }
    }
}

/// Validate augmentation tunables.
pub fn validate_augmentation_params(params: &AugmentationParams) -> Result<(), SynthError> {
    if params.max_line_thickness == 0 {
        return Err(SynthError::InvalidConfig {
            message: "max line thickness must be at least 1".to_string(),
        });
    }
    if params.max_diameter == 0 {
        return Err(SynthError::InvalidConfig {
            message: "max diameter must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Smallest combination size enumerated after the single-figure images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombinationStart {
    /// Every non-empty subset, including the singletons again.
    #[default]
    Singles,
    /// Only subsets of two or more figures.
    Pairs,
}

impl CombinationStart {
    fn min_size(self) -> usize {
        match self {
            CombinationStart::Singles => 1,
            CombinationStart::Pairs => 2,
        }
    }
}

/// Figures drawn for one source image and the images they expand into.
#[derive(Clone, Debug)]
pub struct AugmentationPlan {
    figures: Vec<Figure>,
    combination_start: CombinationStart,
}

impl AugmentationPlan {
    /// Draw figures for a `width` x `height` source, family by family.
    pub fn calculate<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        params: &AugmentationParams,
        families: &[Family],
        rng: &mut R,
    ) -> Self {
        let mut families = families.to_vec();
        families.sort();
        families.dedup();

        let mut figures = Vec::new();
        for family in families {
            match family {
                Family::Rotate => {}
                Family::NewElements => {
                    for _ in 0..params.options_per_family {
                        if let Some(kind) = FigureKind::SHAPES.choose(rng) {
                            figures.push(Figure::generate_random(
                                *kind, width, height, params, rng,
                            ));
                        }
                    }
                    for _ in 0..params.extra_points {
                        figures.push(Figure::generate_random(
                            FigureKind::Point,
                            width,
                            height,
                            params,
                            rng,
                        ));
                    }
                }
                Family::Glare => {
                    for _ in 0..params.options_per_family {
                        figures.push(Figure::generate_random(
                            FigureKind::Glare,
                            width,
                            height,
                            params,
                            rng,
                        ));
                    }
                }
                Family::Defocus => {
                    figures.push(Figure::generate_random(
                        FigureKind::Blur,
                        width,
                        height,
                        params,
                        rng,
                    ));
                }
                Family::Compression => {
                    for _ in 0..params.options_per_family {
                        figures.push(Figure::generate_random(
                            FigureKind::Resample,
                            width,
                            height,
                            params,
                            rng,
                        ));
                    }
                }
            }
        }

        Self::from_figures(figures)
    }

    /// Plan over explicit figures.
    pub fn from_figures(figures: Vec<Figure>) -> Self {
        Self {
            figures,
            combination_start: CombinationStart::default(),
        }
    }

    pub fn with_combination_start(mut self, combination_start: CombinationStart) -> Self {
        self.combination_start = combination_start;
        self
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// Number of single-figure images.
    pub fn standard_count(&self) -> usize {
        self.figures.len()
    }

    /// `Σ C(n, k)` for `k` in `0..=n`, the empty combination included.
    pub fn combinations_count(&self) -> u128 {
        let n = self.figures.len() as u128;
        (0..=n).fold(0u128, |total, k| total.saturating_add(binomial(n, k)))
    }

    /// `standard_count + combinations_count`.
    ///
    /// Counts the empty combination, which [`draws`](Self::draws) never
    /// yields, so this is one more than the number of images produced with
    /// [`CombinationStart::Singles`].
    pub fn all_count(&self) -> u128 {
        (self.standard_count() as u128).saturating_add(self.combinations_count())
    }

    /// Exact number of images [`draws`](Self::draws) yields.
    pub fn yield_count(&self) -> u128 {
        let n = self.figures.len() as u128;
        let combinations: u128 = (self.combination_start.min_size() as u128..=n)
            .fold(0u128, |total, k| total.saturating_add(binomial(n, k)));
        n.saturating_add(combinations)
    }

    /// Lazily yield augmented copies of `source`.
    ///
    /// First one image per figure, then one per combination in lexicographic
    /// order of figure indices with the figures applied in generation order.
    /// `source` itself is never modified.
    pub fn draws<'a>(&'a self, source: &'a RgbaImage) -> impl Iterator<Item = RgbaImage> + 'a {
        let singles = self
            .figures
            .iter()
            .map(move |figure| figure.draw(source.clone()));

        let n = self.figures.len();
        let combinations = (self.combination_start.min_size()..=n)
            .flat_map(move |size| Combinations::new(n, size))
            .map(move |indices| {
                indices
                    .into_iter()
                    .fold(source.clone(), |image, index| self.figures[index].draw(image))
            });

        singles.chain(combinations)
    }
}

fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u128, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}

/// `k`-element index combinations of `0..n` in lexicographic order.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] != i + self.n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}
