//! Shape registry
//!
//! Maps shape type keys to factories producing a default instance of the
//! shape. Tools ask the registry for new shapes instead of constructing
//! them, so a host can swap in its own connector flavour.

use crate::connector::Connector;
use crate::resources::{ToolResources, CONNECTOR_SHAPE_ID};
use crate::shape::Shape;
use kurbo::{Ellipse, Point, Rect, Shape as KurboShape};
use std::collections::HashMap;

/// Registry key of the default rectangle shape
pub const RECTANGLE_SHAPE_ID: &str = "RectangleShape";

/// Registry key of the default ellipse shape
pub const ELLIPSE_SHAPE_ID: &str = "EllipseShape";

/// Factory creating a default shape instance
pub type ShapeFactory = fn(&ToolResources) -> Shape;

/// Known shape factories, keyed by type id
#[derive(Clone)]
pub struct ShapeRegistry {
    factories: HashMap<String, ShapeFactory>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_connector(_resources: &ToolResources) -> Shape {
    Shape::new_connector(Connector::new(Point::ORIGIN, Point::new(140.0, 140.0)))
}

fn default_rectangle(_resources: &ToolResources) -> Shape {
    Shape::new(Rect::new(0.0, 0.0, 100.0, 100.0).to_path(0.1))
}

fn default_ellipse(_resources: &ToolResources) -> Shape {
    Shape::new(Ellipse::new((50.0, 50.0), (50.0, 50.0), 0.0).to_path(0.1))
}

impl ShapeRegistry {
    /// Create a registry with the built-in shapes
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(CONNECTOR_SHAPE_ID, default_connector);
        registry.register(RECTANGLE_SHAPE_ID, default_rectangle);
        registry.register(ELLIPSE_SHAPE_ID, default_ellipse);
        registry
    }

    /// Create a registry without any factories
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) a factory
    pub fn register(&mut self, type_id: impl Into<String>, factory: ShapeFactory) {
        self.factories.insert(type_id.into(), factory);
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    /// Create a default shape of the given type
    pub fn create_default_shape(&self, type_id: &str, resources: &ToolResources) -> Option<Shape> {
        self.factories.get(type_id).map(|factory| factory(resources))
    }
}
