//! Document structure for Connectbeam
//!
//! The Document owns every shape on the canvas. It doubles as the canvas
//! shape manager: spatial queries and shape registration go through it.

use crate::connector::{Binding, ConnectError, Endpoint};
use crate::shape::Shape;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document settings and shapes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for this document
    pub id: Uuid,

    /// Document name
    pub name: String,

    /// Shapes in insertion order; paint order is `z_index` first
    shapes: Vec<Shape>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Untitled".to_string(),
            shapes: Vec::new(),
        }
    }
}

/// Inclusive rectangle overlap
///
/// Connectors along an axis have zero-width bounds, so touching counts.
fn rects_touch(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

impl Document {
    /// Create a new empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// All shapes in insertion order
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Get a shape by ID
    pub fn get_shape(&self, id: &Uuid) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn contains_shape(&self, id: &Uuid) -> bool {
        self.get_shape(id).is_some()
    }

    /// Shapes sorted back to front
    pub fn paint_order(&self) -> Vec<&Shape> {
        let mut shapes: Vec<&Shape> = self.shapes.iter().collect();
        // stable: equal z keeps insertion order
        shapes.sort_by_key(|s| s.z_index);
        shapes
    }

    /// Shapes whose bounds touch `rect`, sorted back to front
    pub fn shapes_at(&self, rect: Rect) -> Vec<&Shape> {
        self.paint_order()
            .into_iter()
            .filter(|s| rects_touch(s.bounding_rect(), rect))
            .collect()
    }

    /// Z index that paints above every existing shape
    pub fn next_z_index(&self) -> i32 {
        self.shapes
            .iter()
            .map(|s| s.z_index)
            .max()
            .map_or(0, |z| z + 1)
    }

    /// Add a shape while setting up a document
    pub fn add_shape(&mut self, shape: Shape) -> Uuid {
        self.add_shape_internal(shape)
    }

    // === MUTATION METHODS (pub(crate) - used by actions and the tool) ===

    /// Get mutable access to a shape by ID
    pub(crate) fn get_shape_mut(&mut self, id: &Uuid) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    /// Register a shape; a shape whose id is already present is left alone
    pub(crate) fn add_shape_internal(&mut self, shape: Shape) -> Uuid {
        let id = shape.id;
        if !self.contains_shape(&id) {
            self.shapes.push(shape);
        }
        id
    }

    /// Remove a shape, returning it
    pub(crate) fn remove_shape_internal(&mut self, id: &Uuid) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| &s.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// Modify a shape in place
    pub(crate) fn modify_shape_internal<F>(&mut self, id: &Uuid, f: F) -> bool
    where
        F: FnOnce(&mut Shape),
    {
        match self.get_shape_mut(id) {
            Some(shape) => {
                f(shape);
                true
            }
            None => false,
        }
    }

    /// Check that `connector_id` may bind to `binding`
    ///
    /// Returns the document position of the connection point. The connector
    /// itself does not have to be in the document yet.
    pub fn resolve_binding(
        &self,
        connector_id: &Uuid,
        binding: Binding,
    ) -> Result<Point, ConnectError> {
        if connector_id == &binding.shape_id {
            return Err(ConnectError::SelfConnection);
        }
        let target = self
            .get_shape(&binding.shape_id)
            .ok_or(ConnectError::UnknownShape(binding.shape_id))?;
        if target.is_connector() {
            return Err(ConnectError::ConnectorTarget(binding.shape_id));
        }
        target
            .connection_point_in_document(binding.point_id)
            .ok_or(ConnectError::UnknownConnectionPoint(
                binding.shape_id,
                binding.point_id,
            ))
    }

    /// Bind a connector endpoint to a connection point
    ///
    /// The endpoint handle is moved onto the connection point.
    pub(crate) fn connect(
        &mut self,
        connector_id: &Uuid,
        endpoint: Endpoint,
        binding: Binding,
    ) -> Result<(), ConnectError> {
        let position = self.resolve_binding(connector_id, binding)?;

        let shape = self
            .get_shape_mut(connector_id)
            .ok_or(ConnectError::UnknownShape(*connector_id))?;
        let handle = shape
            .as_connector()
            .map(|c| c.handle_of(endpoint))
            .ok_or(ConnectError::NotAConnector(*connector_id))?;
        shape.move_handle(handle, position);
        if let Some(connector) = shape.as_connector_mut() {
            connector.set_binding(endpoint, Some(binding));
        }
        Ok(())
    }

    /// Drop the binding of a connector endpoint
    pub(crate) fn disconnect(&mut self, connector_id: &Uuid, endpoint: Endpoint) {
        if let Some(connector) = self
            .get_shape_mut(connector_id)
            .and_then(|s| s.as_connector_mut())
        {
            connector.set_binding(endpoint, None);
        }
    }

    /// Move bound connector endpoints onto their connection points
    ///
    /// Bindings whose shape or connection point no longer exists are
    /// dropped; the endpoint keeps its last position.
    pub(crate) fn update_connections(&mut self) {
        let mut updates: Vec<(Uuid, Endpoint, Option<Point>)> = Vec::new();
        for shape in &self.shapes {
            let Some(connector) = shape.as_connector() else {
                continue;
            };
            for endpoint in [Endpoint::First, Endpoint::Second] {
                if let Some(binding) = connector.binding(endpoint) {
                    let target = self
                        .get_shape(&binding.shape_id)
                        .and_then(|t| t.connection_point_in_document(binding.point_id));
                    updates.push((shape.id, endpoint, target));
                }
            }
        }

        for (connector_id, endpoint, target) in updates {
            let Some(shape) = self.get_shape_mut(&connector_id) else {
                continue;
            };
            match target {
                Some(position) => {
                    let handle = shape.as_connector().map(|c| c.handle_of(endpoint));
                    if let Some(handle) = handle {
                        shape.move_handle(handle, position);
                    }
                }
                None => {
                    log::debug!(
                        "Dropping stale {:?} binding of connector {}",
                        endpoint,
                        connector_id
                    );
                    if let Some(connector) = shape.as_connector_mut() {
                        connector.set_binding(endpoint, None);
                    }
                }
            }
        }
    }
}
