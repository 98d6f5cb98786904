//! Placement of shapes on the canvas
//!
//! Shapes keep their outline and connection points in a local space. A
//! `Transform` places that space in the document: scale first, then
//! rotation, then translation.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    /// Degrees, clockwise in a y-down view
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::with_position(0.0, 0.0)
    }
}

impl Transform {
    pub fn with_position(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    pub fn shape_to_document(&self, point: Point) -> Point {
        self.to_affine() * point
    }

    /// Inverse of [`Transform::shape_to_document`]
    ///
    /// With a zero scale only the translation is undone.
    pub fn document_to_shape(&self, point: Point) -> Point {
        let affine = self.to_affine();
        if affine.determinant().abs() <= f64::EPSILON {
            return Point::new(point.x - self.x, point.y - self.y);
        }
        affine.inverse() * point
    }
}
