//! Handle decorations painted by the connection tool
//!
//! Decorations are collected as plain data in view space and rendered into
//! a vello scene afterwards, so hosts without a GPU (and tests) can inspect
//! what would be drawn.

use crate::canvas::Canvas;
use crate::connector::ConnectionPointId;
use crate::shape::{Shape, ShapeColor};
use kurbo::{Affine, Point, Rect, Stroke};
use vello::peniko::Fill;
use vello::Scene;

/// One handle square in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDecoration {
    pub rect: Rect,
    pub fill: ShapeColor,
    pub stroke: ShapeColor,
}

impl HandleDecoration {
    /// Square of `radius` view pixels around a document point
    fn around(
        canvas: &Canvas,
        document_point: Point,
        radius: f64,
        fill: ShapeColor,
        stroke: ShapeColor,
    ) -> Self {
        let center = canvas.view.document_to_view_point(document_point);
        Self {
            rect: Rect::from_center_size(center, (2.0 * radius, 2.0 * radius)),
            fill,
            stroke,
        }
    }
}

/// Handles of a connector; the active one is red
pub fn connector_handle_decorations(
    canvas: &Canvas,
    shape: &Shape,
    active: Option<usize>,
) -> Vec<HandleDecoration> {
    let Some(connector) = shape.as_connector() else {
        return Vec::new();
    };
    let radius = canvas.resources.handle_radius;

    connector
        .handles()
        .iter()
        .enumerate()
        .map(|(index, local)| {
            let fill = if active == Some(index) {
                ShapeColor::RED
            } else {
                ShapeColor::WHITE
            };
            HandleDecoration::around(
                canvas,
                shape.shape_to_document(*local),
                radius,
                fill,
                ShapeColor::BLUE,
            )
        })
        .collect()
}

/// Connection points of a shape; the active one is red
pub fn connection_point_decorations(
    canvas: &Canvas,
    shape: &Shape,
    active: Option<ConnectionPointId>,
) -> Vec<HandleDecoration> {
    let radius = canvas.resources.handle_radius;

    shape
        .connection_points()
        .iter()
        .map(|(id, local)| {
            let fill = if active == Some(*id) {
                ShapeColor::RED
            } else {
                ShapeColor::DARK_GREEN
            };
            HandleDecoration::around(
                canvas,
                shape.shape_to_document(*local),
                radius,
                fill,
                ShapeColor::BLACK,
            )
        })
        .collect()
}

/// Marker for the connection point a dragged endpoint snaps to
pub fn snap_target_decoration(canvas: &Canvas, document_point: Point) -> HandleDecoration {
    HandleDecoration::around(
        canvas,
        document_point,
        canvas.resources.grab_sensitivity,
        ShapeColor::rgba(255, 0, 0, 96),
        ShapeColor::RED,
    )
}

/// Draw decorations into a scene (view space)
pub fn render_decorations(decorations: &[HandleDecoration], scene: &mut Scene) {
    let outline = Stroke::new(1.0);
    for decoration in decorations {
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            decoration.fill.to_peniko(),
            None,
            &decoration.rect,
        );
        scene.stroke(
            &outline,
            Affine::IDENTITY,
            decoration.stroke.to_peniko(),
            None,
            &decoration.rect,
        );
    }
}
