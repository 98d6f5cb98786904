//! Add shape action
//!
//! Commits a shape to the document. The connection tool registers a new
//! connector with the canvas before committing, so executing this action
//! on a document that already holds the shape is a no-op.

use crate::action::Action;
use crate::document::Document;
use crate::shape::Shape;

/// Puts a shape into the document
pub struct AddShapeAction {
    /// Snapshot re-inserted on redo
    shape: Shape,
}

impl AddShapeAction {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }
}

impl Action for AddShapeAction {
    fn execute(&mut self, document: &mut Document) {
        document.add_shape_internal(self.shape.clone());
    }

    fn rollback(&mut self, document: &mut Document) {
        if let Some(shape) = document.remove_shape_internal(&self.shape.id) {
            self.shape = shape;
        }
    }

    fn description(&self) -> String {
        if self.shape.is_connector() {
            "Add connection".to_string()
        } else {
            "Add shape".to_string()
        }
    }
}
