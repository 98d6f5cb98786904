//! Scene files
//!
//! A scene lists the shapes a replay starts from. Shapes are described by
//! their geometry rather than as raw outlines so scenes stay hand-editable.

use anyhow::Context;
use connectbeam_core::connector::{ConnectionPointId, Connector};
use connectbeam_core::document::Document;
use connectbeam_core::shape::Shape;
use kurbo::{Ellipse, Point, Rect, Shape as KurboShape};
use serde::Deserialize;
use std::path::Path;

/// One shape in a scene file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SceneShape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(flatten)]
        common: ShapeOptions,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        #[serde(flatten)]
        common: ShapeOptions,
    },
    Connector {
        from: Point,
        to: Point,
        #[serde(default)]
        bends: Vec<Point>,
        #[serde(default)]
        z_index: i32,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Options shared by outline shapes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShapeOptions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub z_index: i32,
    /// Replaces the default edge-midpoint connection points (shape space)
    #[serde(default)]
    pub connection_points: Option<Vec<(ConnectionPointId, Point)>>,
}

/// Starting state of a replay
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default = "default_scene_name")]
    pub name: String,
    pub shapes: Vec<SceneShape>,
}

fn default_scene_name() -> String {
    "Scene".to_string()
}

impl SceneShape {
    /// Build the document shape
    ///
    /// Outline shapes are placed with their transform, so connection points
    /// live in the shape's own space.
    pub fn to_shape(&self) -> Shape {
        match self {
            SceneShape::Rectangle {
                x,
                y,
                width,
                height,
                common,
            } => {
                let path = Rect::new(0.0, 0.0, *width, *height).to_path(0.1);
                common.apply(Shape::new(path).with_position(*x, *y))
            }
            SceneShape::Ellipse {
                cx,
                cy,
                rx,
                ry,
                common,
            } => {
                let path = Ellipse::new((*rx, *ry), (*rx, *ry), 0.0).to_path(0.1);
                common.apply(Shape::new(path).with_position(cx - rx, cy - ry))
            }
            SceneShape::Connector {
                from,
                to,
                bends,
                z_index,
                name,
            } => {
                let mut handles = vec![*from];
                handles.extend(bends.iter().copied());
                handles.push(*to);
                let mut shape =
                    Shape::new_connector(Connector::with_handles(handles)).with_z_index(*z_index);
                if let Some(name) = name {
                    shape = shape.with_name(name.clone());
                }
                shape
            }
        }
    }
}

impl ShapeOptions {
    fn apply(&self, mut shape: Shape) -> Shape {
        shape = shape.with_z_index(self.z_index);
        if let Some(name) = &self.name {
            shape = shape.with_name(name.clone());
        }
        if let Some(points) = &self.connection_points {
            shape = shape.with_connection_points(points.iter().copied());
        }
        shape
    }
}

impl Scene {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing scene")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Document holding every scene shape
    pub fn to_document(&self) -> Document {
        let mut document = Document::new(self.name.clone());
        for shape in &self.shapes {
            document.add_shape(shape.to_shape());
        }
        document
    }
}
