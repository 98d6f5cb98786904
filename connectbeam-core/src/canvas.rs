//! Canvas a tool is bound to
//!
//! Bundles everything a tool consumes from its host: the document behind
//! an action executor, the shape registry, tool resources, the view
//! converter, and the outputs a tool produces besides document changes
//! (status text, repaint regions, cursor).

use crate::action::{Action, ActionExecutor};
use crate::actions::AddShapeAction;
use crate::document::Document;
use crate::registry::ShapeRegistry;
use crate::resources::ToolResources;
use crate::shape::Shape;
use crate::view::ViewConverter;
use kurbo::{Point, Rect};
use uuid::Uuid;

/// Mouse cursor requested by the active tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    PointingHand,
}

/// Host-side state shared with the active tool
pub struct Canvas {
    executor: ActionExecutor,

    /// Pan and zoom of the view
    pub view: ViewConverter,

    /// Handle sizes and grab distances
    pub resources: ToolResources,

    /// Shape factories
    pub registry: ShapeRegistry,

    status_text: String,
    dirty_regions: Vec<Rect>,
    cursor: CursorShape,
}

impl Canvas {
    /// Create a canvas showing `document` with default resources
    pub fn new(document: Document) -> Self {
        Self {
            executor: ActionExecutor::new(document),
            view: ViewConverter::default(),
            resources: ToolResources::default(),
            registry: ShapeRegistry::new(),
            status_text: String::new(),
            dirty_regions: Vec::new(),
            cursor: CursorShape::default(),
        }
    }

    pub fn with_resources(mut self, resources: ToolResources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_view(mut self, view: ViewConverter) -> Self {
        self.view = view;
        self
    }

    pub fn with_registry(mut self, registry: ShapeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn document(&self) -> &Document {
        self.executor.document()
    }

    /// Live document access; see [`ActionExecutor::document_mut`]
    pub fn document_mut(&mut self) -> &mut Document {
        self.executor.document_mut()
    }

    /// Undo/redo stacks
    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut ActionExecutor {
        &mut self.executor
    }

    /// Submit an action to the undo stack (executing it)
    pub fn add_command(&mut self, action: Box<dyn Action>) {
        self.executor.execute(action);
    }

    // === SHAPE MANAGER ===

    /// Register a shape so it is painted and hit-tested (no undo entry)
    pub fn add_shape(&mut self, shape: Shape) -> Uuid {
        self.executor.document_mut().add_shape_internal(shape)
    }

    /// Unregister a shape (no undo entry)
    pub fn remove_shape(&mut self, id: &Uuid) -> Option<Shape> {
        let removed = self.executor.document_mut().remove_shape_internal(id);
        if let Some(shape) = &removed {
            self.update_rect(shape.bounding_rect());
        }
        removed
    }

    /// Shapes touching `rect`, back to front
    pub fn shapes_at(&self, rect: Rect) -> Vec<&Shape> {
        self.document().shapes_at(rect)
    }

    // === SHAPE CONTROLLER ===

    /// Action committing a registered shape to the document
    pub fn add_shape_command(&self, id: &Uuid) -> Option<Box<dyn Action>> {
        let shape = self.document().get_shape(id)?.clone();
        Some(Box::new(AddShapeAction::new(shape)))
    }

    // === HANDLE GEOMETRY ===

    /// Square around `point` used for grabbing, in the units of `point`
    pub fn handle_grab_rect(&self, point: Point) -> Rect {
        let side = self
            .view
            .view_to_document_length(2.0 * self.resources.grab_sensitivity);
        Rect::from_center_size(point, (side, side))
    }

    /// Square around `point` covered by a painted handle
    pub fn handle_paint_rect(&self, point: Point) -> Rect {
        let side = self
            .view
            .view_to_document_length(2.0 * self.resources.handle_radius);
        Rect::from_center_size(point, (side, side))
    }

    /// Largest squared distance that still counts as a hit
    ///
    /// Compared against document-space distances as is, without zoom.
    pub fn square_grab_distance(&self) -> f64 {
        self.resources.grab_sensitivity * self.resources.grab_sensitivity
    }

    // === TOOL OUTPUTS ===

    pub fn set_status_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.status_text {
            log::trace!("Status text: {:?}", text);
            self.status_text = text;
        }
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Mark a document-space region for repainting
    ///
    /// A region already covered by a pending one is not recorded again.
    pub fn update_rect(&mut self, rect: Rect) {
        if self.dirty_regions.iter().any(|r| r.union(rect) == *r) {
            return;
        }
        self.dirty_regions.push(rect);
    }

    /// Mark the bounds of a shape for repainting
    pub fn update_shape(&mut self, id: &Uuid) {
        if let Some(rect) = self.document().get_shape(id).map(|s| s.bounding_rect()) {
            self.update_rect(rect);
        }
    }

    /// Regions marked since the last call
    ///
    /// The host drains this once per frame; nothing else clears it.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.dirty_regions)
    }

    pub fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }
}
