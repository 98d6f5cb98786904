//! Shape system for Connectbeam
//!
//! A shape is either an outline (a `kurbo::BezPath` in shape space) or a
//! connector. Outline shapes carry connection points that connectors can
//! bind to. Connectors expose their handles through the connector facet
//! returned by [`Shape::as_connector`].

use crate::connector::{ConnectionPointId, Connector};
use crate::object::Transform;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use vello::peniko::Color;

/// Serializable color representation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShapeColor {
    pub const WHITE: ShapeColor = ShapeColor::rgb(255, 255, 255);
    pub const BLACK: ShapeColor = ShapeColor::rgb(0, 0, 0);
    pub const RED: ShapeColor = ShapeColor::rgb(255, 0, 0);
    pub const BLUE: ShapeColor = ShapeColor::rgb(0, 0, 255);
    pub const DARK_GREEN: ShapeColor = ShapeColor::rgb(0, 128, 0);

    /// Create from RGB (opaque)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create from RGBA
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to peniko Color
    pub fn to_peniko(&self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// What a shape is made of
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Closed or open outline
    Path(BezPath),
    /// Line between two (possibly bound) endpoints
    Connector(Connector),
}

/// A shape with geometry, placement and connection points
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier for this shape
    pub id: Uuid,

    /// Name for display in UI
    #[serde(default)]
    pub name: Option<String>,

    /// Shape space to document space
    #[serde(default)]
    pub transform: Transform,

    /// Paint order; higher values are painted later (on top)
    #[serde(default)]
    pub z_index: i32,

    /// Geometry
    pub kind: ShapeKind,

    /// Connection points in shape space, keyed by id
    #[serde(default)]
    connection_points: BTreeMap<ConnectionPointId, Point>,
}

impl Shape {
    /// Create an outline shape with the four default connection points
    ///
    /// Points 0 to 3 sit on the middle of the top, right, bottom and left
    /// edges of the outline's bounding box.
    pub fn new(path: BezPath) -> Self {
        let bbox = path.bounding_box();
        let center = bbox.center();
        let connection_points = BTreeMap::from([
            (0, Point::new(center.x, bbox.y0)),
            (1, Point::new(bbox.x1, center.y)),
            (2, Point::new(center.x, bbox.y1)),
            (3, Point::new(bbox.x0, center.y)),
        ]);
        Self {
            id: Uuid::new_v4(),
            name: None,
            transform: Transform::default(),
            z_index: 0,
            kind: ShapeKind::Path(path),
            connection_points,
        }
    }

    /// Create a connector shape
    pub fn new_connector(connector: Connector) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            transform: Transform::default(),
            z_index: 0,
            kind: ShapeKind::Connector(connector),
            connection_points: BTreeMap::new(),
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.transform.set_position(x, y);
        self
    }

    /// Set the paint order
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Replace all connection points
    pub fn with_connection_points(
        mut self,
        points: impl IntoIterator<Item = (ConnectionPointId, Point)>,
    ) -> Self {
        self.connection_points = points.into_iter().collect();
        self
    }

    /// Connector facet, if this shape is a connector
    pub fn as_connector(&self) -> Option<&Connector> {
        match &self.kind {
            ShapeKind::Connector(connector) => Some(connector),
            ShapeKind::Path(_) => None,
        }
    }

    /// Mutable connector facet, if this shape is a connector
    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match &mut self.kind {
            ShapeKind::Connector(connector) => Some(connector),
            ShapeKind::Path(_) => None,
        }
    }

    pub fn is_connector(&self) -> bool {
        matches!(self.kind, ShapeKind::Connector(_))
    }

    /// Connection points in shape space
    pub fn connection_points(&self) -> &BTreeMap<ConnectionPointId, Point> {
        &self.connection_points
    }

    /// Position of a connection point in shape space
    pub fn connection_point(&self, id: ConnectionPointId) -> Option<Point> {
        self.connection_points.get(&id).copied()
    }

    pub fn has_connection_point(&self, id: ConnectionPointId) -> bool {
        self.connection_points.contains_key(&id)
    }

    /// Add a connection point and return its id
    ///
    /// The new id is one past the largest id in use. Connectors have no
    /// connection points; adding one to a connector returns `None`.
    pub fn add_connection_point(&mut self, position: Point) -> Option<ConnectionPointId> {
        if self.is_connector() {
            return None;
        }
        let id = self
            .connection_points
            .keys()
            .next_back()
            .map_or(0, |last| last + 1);
        self.connection_points.insert(id, position);
        Some(id)
    }

    /// Insert a connection point with a specific id, replacing any existing one
    pub fn insert_connection_point(&mut self, id: ConnectionPointId, position: Point) {
        if !self.is_connector() {
            self.connection_points.insert(id, position);
        }
    }

    /// Remove a connection point, returning its old position
    pub fn remove_connection_point(&mut self, id: ConnectionPointId) -> Option<Point> {
        self.connection_points.remove(&id)
    }

    /// Bounding box of the geometry in shape space
    pub fn outline_bounding_box(&self) -> Rect {
        match &self.kind {
            ShapeKind::Path(path) => path.bounding_box(),
            ShapeKind::Connector(connector) => connector.bounding_box(),
        }
    }

    /// Bounding rectangle in document space
    pub fn bounding_rect(&self) -> Rect {
        self.transform
            .to_affine()
            .transform_rect_bbox(self.outline_bounding_box())
    }

    /// Map a point from shape space to document space
    pub fn shape_to_document(&self, point: Point) -> Point {
        self.transform.shape_to_document(point)
    }

    /// Map a point from document space to shape space
    pub fn document_to_shape(&self, point: Point) -> Point {
        self.transform.document_to_shape(point)
    }

    /// Document position of a connection point
    pub fn connection_point_in_document(&self, id: ConnectionPointId) -> Option<Point> {
        self.connection_point(id).map(|p| self.shape_to_document(p))
    }

    /// Document position of a connector handle
    pub fn handle_in_document(&self, handle: usize) -> Option<Point> {
        self.as_connector()
            .and_then(|c| c.handle_position(handle))
            .map(|p| self.shape_to_document(p))
    }

    /// Move a connector handle to a document position
    ///
    /// Returns false for non-connectors and unknown handles.
    pub fn move_handle(&mut self, handle: usize, document_point: Point) -> bool {
        let local = self.document_to_shape(document_point);
        match self.as_connector_mut() {
            Some(connector) => connector.set_handle_position(handle, local),
            None => false,
        }
    }
}
