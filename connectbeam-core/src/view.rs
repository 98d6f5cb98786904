//! View/document coordinate conversion
//!
//! The canvas shows the document with a pan offset and a zoom factor.
//! Pointer events arrive in document coordinates; decorations are painted
//! in view coordinates.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pan and zoom of one canvas view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewConverter {
    /// View pixels per document unit
    pub zoom: f64,
    /// View position of the document origin
    pub pan_offset: Vec2,
}

impl Default for ViewConverter {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
        }
    }
}

impl ViewConverter {
    pub fn new(zoom: f64, pan_offset: Vec2) -> Self {
        Self { zoom, pan_offset }
    }

    /// Affine mapping document space to view space
    pub fn document_to_view(&self) -> Affine {
        Affine::translate(self.pan_offset) * Affine::scale(self.zoom)
    }

    pub fn document_to_view_point(&self, point: Point) -> Point {
        self.document_to_view() * point
    }

    pub fn view_to_document_point(&self, point: Point) -> Point {
        self.document_to_view().inverse() * point
    }

    /// Convert a length in view pixels into document units
    pub fn view_to_document_length(&self, length: f64) -> f64 {
        if self.zoom.abs() <= f64::EPSILON {
            return length;
        }
        length / self.zoom
    }
}
