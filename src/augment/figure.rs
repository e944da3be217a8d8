//! Random figures drawn onto images.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_ellipse_mut, draw_hollow_ellipse_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, Blend,
};
use imageproc::filter::gaussian_blur_f32;
use imageproc::rect::Rect;
use rand::Rng;

use super::AugmentationParams;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GLARE: Rgba<u8> = Rgba([255, 255, 255, 125]);
const MAX_BLUR_RADIUS: u32 = 3;

/// Kind of figure to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FigureKind {
    Point,
    Line,
    Ellipse,
    Rectangle,
    Glare,
    Blur,
    Resample,
}

impl FigureKind {
    /// Shapes a `NewElements` option is chosen from.
    pub const SHAPES: [FigureKind; 3] =
        [FigureKind::Line, FigureKind::Ellipse, FigureKind::Rectangle];
}

/// A box given by two corners, always with `x_min <= x_max` and `y_min <= y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FigureBounds {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl FigureBounds {
    /// Bounds spanned by two arbitrary corners.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            x_min: a.0.min(b.0),
            y_min: a.1.min(b.1),
            x_max: a.0.max(b.0),
            y_max: a.1.max(b.1),
        }
    }

    fn center(&self) -> (i32, i32) {
        ((self.x_min + self.x_max) / 2, (self.y_min + self.y_max) / 2)
    }

    fn radii(&self) -> (i32, i32) {
        ((self.x_max - self.x_min) / 2, (self.y_max - self.y_min) / 2)
    }
}

/// One augmentation step with every random parameter already drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum Figure {
    Point { x: i32, y: i32 },
    Line { start: (i32, i32), end: (i32, i32), thickness: u32 },
    Ellipse { bounds: FigureBounds, thickness: u32 },
    Rectangle { bounds: FigureBounds, thickness: u32 },
    Glare { bounds: FigureBounds },
    Blur { radius: u32 },
    Resample { width: u32, height: u32 },
}

impl Figure {
    /// Draw the random parameters of a `kind` figure for a `width` x `height` canvas.
    pub fn generate_random<R: Rng + ?Sized>(
        kind: FigureKind,
        width: u32,
        height: u32,
        params: &AugmentationParams,
        rng: &mut R,
    ) -> Figure {
        let w = width.max(1) as i32;
        let h = height.max(1) as i32;
        let max_thickness = params.max_line_thickness.max(1);
        let max_diameter = params.max_diameter.max(1);

        match kind {
            FigureKind::Point => Figure::Point {
                x: rng.random_range(0..=w),
                y: rng.random_range(0..=h),
            },
            FigureKind::Line => {
                let x0 = rng.random_range(0..=w);
                let y0 = rng.random_range(0..=h);
                Figure::Line {
                    start: (x0, y0),
                    end: (rng.random_range(x0..=w), rng.random_range(y0..=h)),
                    thickness: rng.random_range(1..=max_thickness),
                }
            }
            FigureKind::Ellipse => {
                let diameter = rng.random_range(1..=max_diameter);
                Figure::Ellipse {
                    bounds: diagonal_bounds(rng.random_range(0..=w), diameter),
                    thickness: rng.random_range(1..=max_thickness),
                }
            }
            FigureKind::Rectangle => {
                let diameter = rng.random_range(1..=max_diameter) as i32;
                let x0 = rng.random_range(0..=w);
                let y0 = rng.random_range(0..=h);
                let indent = diameter / rng.random_range(2..=5);
                Figure::Rectangle {
                    bounds: FigureBounds::from_corners(
                        (x0, y0),
                        (x0 + indent, y0 + diameter - indent),
                    ),
                    thickness: rng.random_range(1..=max_thickness),
                }
            }
            FigureKind::Glare => {
                let diameter = rng.random_range(1..=(width.max(height) / 4).max(1));
                Figure::Glare {
                    bounds: diagonal_bounds(rng.random_range(0..=w), diameter),
                }
            }
            FigureKind::Blur => Figure::Blur {
                radius: rng.random_range(1..=MAX_BLUR_RADIUS),
            },
            FigureKind::Resample => {
                let x_min = rng.random_range(1..=width.max(1));
                let y_min = rng.random_range(1..=height.max(1));
                Figure::Resample {
                    width: width.saturating_sub(x_min).max(1),
                    height: height.saturating_sub(y_min).max(1),
                }
            }
        }
    }

    /// Apply the figure, returning the new image.
    ///
    /// Shapes are drawn in white; parts outside the canvas are clipped.
    pub fn draw(&self, mut image: RgbaImage) -> RgbaImage {
        match self {
            Figure::Point { x, y } => {
                if *x >= 0 && *y >= 0 && (*x as u32) < image.width() && (*y as u32) < image.height()
                {
                    image.put_pixel(*x as u32, *y as u32, WHITE);
                }
                image
            }
            Figure::Line {
                start,
                end,
                thickness,
            } => {
                let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
                for offset in thickness_offsets(*thickness) {
                    let (dx, dy) = if steep { (offset, 0) } else { (0, offset) };
                    draw_line_segment_mut(
                        &mut image,
                        ((start.0 + dx) as f32, (start.1 + dy) as f32),
                        ((end.0 + dx) as f32, (end.1 + dy) as f32),
                        WHITE,
                    );
                }
                image
            }
            Figure::Ellipse { bounds, thickness } => {
                let center = bounds.center();
                let (rx, ry) = bounds.radii();
                for inset in 0..(*thickness as i32) {
                    if inset > rx.min(ry) {
                        break;
                    }
                    draw_hollow_ellipse_mut(&mut image, center, rx - inset, ry - inset, WHITE);
                }
                image
            }
            Figure::Rectangle { bounds, thickness } => {
                for inset in 0..(*thickness as i32) {
                    let width = bounds.x_max - bounds.x_min + 1 - 2 * inset;
                    let height = bounds.y_max - bounds.y_min + 1 - 2 * inset;
                    if width <= 0 || height <= 0 {
                        break;
                    }
                    draw_hollow_rect_mut(
                        &mut image,
                        Rect::at(bounds.x_min + inset, bounds.y_min + inset)
                            .of_size(width as u32, height as u32),
                        WHITE,
                    );
                }
                image
            }
            Figure::Glare { bounds } => {
                let (rx, ry) = bounds.radii();
                let mut canvas = Blend(image);
                draw_filled_ellipse_mut(&mut canvas, bounds.center(), rx, ry, GLARE);
                canvas.0
            }
            Figure::Blur { radius } => gaussian_blur_f32(&image, *radius as f32),
            Figure::Resample { width, height } => {
                imageops::resize(&image, *width, *height, FilterType::Lanczos3)
            }
        }
    }
}

/// Square-ish box on the image diagonal, offset by `diameter * cos(45)`.
///
/// The angle is taken in radians, so the offset is roughly half the diameter.
fn diagonal_bounds(x0: i32, diameter: u32) -> FigureBounds {
    let indent = (f64::from(diameter) * 45f64.cos()) as i32;
    FigureBounds::from_corners((x0, x0), (x0 + indent, x0 + indent))
}

fn thickness_offsets(thickness: u32) -> impl Iterator<Item = i32> {
    let thickness = thickness.max(1) as i32;
    let first = -(thickness - 1) / 2;
    first..first + thickness
}
