//! Rectangle packing for text block placement.
//!
//! Text blocks are measured into [`Rectangle`]s and placed onto a fixed-size
//! [`Canvas`] by a [`PackingAlgorithm`]. Rectangles that cannot be placed are
//! silently omitted from the result; callers must not assume every input block
//! produces a position.

/// Identity marker carried by every canvas.
pub const CANVAS_ID: &str = "holst";

/// A sized block to be placed, optionally carrying the text it was measured from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rectangle {
    pub id: String,
    pub w: u32,
    pub h: u32,
    pub text: Option<String>,
}

impl Rectangle {
    /// Creates a new rectangle.
    pub fn new(id: impl Into<String>, w: u32, h: u32, text: Option<String>) -> Self {
        Self {
            id: id.into(),
            w,
            h,
            text,
        }
    }
}

/// The placement bounds, origin (0, 0) at the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub id: &'static str,
    pub w: u32,
    pub h: u32,
}

impl Canvas {
    /// Creates a canvas of the given size.
    pub fn new(w: u32, h: u32) -> Self {
        Self { id: CANVAS_ID, w, h }
    }
}

/// A rectangle placed on a canvas.
///
/// Always satisfies `x_right = x_left + rectangle.w` and
/// `y_bottom = y_top + rectangle.h`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RectanglePosition {
    pub rectangle: Rectangle,
    pub x_left: u32,
    pub y_top: u32,
    pub x_right: u32,
    pub y_bottom: u32,
}

impl RectanglePosition {
    fn place(rectangle: Rectangle, x: u32, y: u32) -> Self {
        let x_right = x + rectangle.w;
        let y_bottom = y + rectangle.h;
        Self {
            rectangle,
            x_left: x,
            y_top: y,
            x_right,
            y_bottom,
        }
    }

    /// Returns true if the two placements share a region of positive area.
    pub fn overlaps(&self, other: &RectanglePosition) -> bool {
        self.x_left < other.x_right
            && other.x_left < self.x_right
            && self.y_top < other.y_bottom
            && other.y_top < self.y_bottom
    }
}

/// Build rectangles from `(w, h, text)` triples, assigning ids `"0"`, `"1"`, ...
/// in input order.
pub fn create_rectangles<S: AsRef<str>>(sized: &[(u32, u32, Option<S>)]) -> Vec<Rectangle> {
    sized
        .iter()
        .enumerate()
        .map(|(index, (w, h, text))| {
            Rectangle::new(
                index.to_string(),
                *w,
                *h,
                text.as_ref().map(|t| t.as_ref().to_string()),
            )
        })
        .collect()
}

/// A strategy that places rectangles onto a canvas.
pub trait PackingAlgorithm {
    /// Place `rectangles` onto `canvas`, returning positions in input order.
    ///
    /// The output length is at most the input length.
    fn pack(&self, canvas: &Canvas, rectangles: Vec<Rectangle>) -> Vec<RectanglePosition>;
}

/// Greedy left-to-right, top-to-bottom shelf packing.
///
/// Rectangles are processed strictly in input order. Each one goes at the
/// cursor of the current row if it fits there; otherwise a new row is opened
/// at the lowest bottom edge reached so far. No backtracking, O(n).
#[derive(Clone, Copy, Debug, Default)]
pub struct ShelfPacker;

impl PackingAlgorithm for ShelfPacker {
    fn pack(&self, canvas: &Canvas, rectangles: Vec<Rectangle>) -> Vec<RectanglePosition> {
        let mut x = 0u32;
        let mut y = 0u32;
        let mut row_bottom = 0u32;
        let mut placed = Vec::with_capacity(rectangles.len());

        for rectangle in rectangles {
            let (w, h) = (rectangle.w, rectangle.h);

            if canvas.w.saturating_sub(x) >= w {
                // Fits in the current row horizontally; no new row is tried if
                // it is too tall here.
                if canvas.h.saturating_sub(y) >= h {
                    row_bottom = row_bottom.max(y + h);
                    placed.push(RectanglePosition::place(rectangle, x, y));
                    x += w;
                }
            } else if canvas.h.saturating_sub(row_bottom) >= h && canvas.w >= w {
                x = 0;
                y = row_bottom;
                row_bottom = row_bottom.max(y + h);
                placed.push(RectanglePosition::place(rectangle, x, y));
                x += w;
            }
        }

        placed
    }
}

/// Pack with the default [`ShelfPacker`].
pub fn pack(canvas: &Canvas, rectangles: Vec<Rectangle>) -> Vec<RectanglePosition> {
    ShelfPacker.pack(canvas, rectangles)
}
