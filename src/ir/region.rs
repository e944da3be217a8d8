//! Labeled bounding boxes in pixel space.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (x_left, y_top, x_right, y_bottom) in pixels.
///
/// Coordinates are signed: a region anchored to a shared baseline may start
/// above the canvas when a block is taller than the line it belongs to. The
/// constructor does not enforce ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionPosition {
    pub x_left: i64,
    pub y_top: i64,
    pub x_right: i64,
    pub y_bottom: i64,
}

impl RegionPosition {
    /// Creates a new region position from explicit edges.
    #[inline]
    pub fn new(x_left: i64, y_top: i64, x_right: i64, y_bottom: i64) -> Self {
        Self {
            x_left,
            y_top,
            x_right,
            y_bottom,
        }
    }

    /// Returns the width of the box. May be negative if malformed.
    #[inline]
    pub fn width(&self) -> i64 {
        self.x_right - self.x_left
    }

    /// Returns the height of the box. May be negative if malformed.
    #[inline]
    pub fn height(&self) -> i64 {
        self.y_bottom - self.y_top
    }

    /// Returns true if the box is properly ordered (left <= right, top <= bottom).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x_left <= self.x_right && self.y_top <= self.y_bottom
    }

    /// Returns true if `other` lies horizontally inside this box and its
    /// vertical span ends at or above this box's bottom edge.
    pub fn spans(&self, other: &RegionPosition) -> bool {
        self.x_left <= other.x_left
            && other.x_right <= self.x_right
            && other.y_bottom <= self.y_bottom
    }
}

/// A labeled bounding box together with the text that produced it.
///
/// The granularity is implied by the collection the region belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub position: RegionPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Region {
    /// Creates a region with its source text.
    pub fn new(position: RegionPosition, text: impl Into<String>) -> Self {
        Self {
            position,
            text: Some(text.into()),
        }
    }

    /// Creates a region without text, as parsed back from a label file.
    pub fn unlabeled(position: RegionPosition) -> Self {
        Self {
            position,
            text: None,
        }
    }
}
