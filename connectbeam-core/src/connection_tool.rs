//! Connection editing tool
//!
//! Lets the user drag connector handles, drag new connectors out of
//! connection points, and add or remove connection points with a double
//! click. Pointer events arrive in document coordinates.
//!
//! Every document change ends up on the undo stack. While a gesture is in
//! progress the active [`InteractionStrategy`] edits the document live and
//! produces the action on release.

use crate::actions::{AddConnectionPointAction, RemoveConnectionPointAction};
use crate::canvas::{Canvas, CursorShape};
use crate::connector::{Binding, ConnectionPointId, Endpoint};
use crate::decorations::{
    connection_point_decorations, connector_handle_decorations, render_decorations,
    HandleDecoration,
};
use crate::hit_test::{handle_at_point, hover_target, square_distance, HandleHit};
use crate::input::{Key, KeyEvent, PointerEvent};
use crate::strategy::{ConnectionHandleStrategy, InteractionStrategy};
use crate::tool::EditMode;
use uuid::Uuid;
use vello::Scene;

/// Tool for creating and editing connections between shapes
#[derive(Default)]
pub struct ConnectionTool {
    mode: EditMode,
    strategy: Option<Box<dyn InteractionStrategy>>,
}

impl ConnectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Whether a drag gesture is in progress
    pub fn has_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    /// The tool became the active canvas tool
    pub fn activate(&mut self, canvas: &mut Canvas) {
        log::debug!("Connection tool activated");
        canvas.set_cursor(CursorShape::PointingHand);
        self.reset_edit_mode(canvas);
    }

    /// Drop any gesture in progress and return to idle
    ///
    /// A connector that was being created and never committed is removed
    /// again. Calling this twice is harmless.
    pub fn deactivate(&mut self, canvas: &mut Canvas) {
        if let Some(mut strategy) = self.strategy.take() {
            log::debug!("Cancelling connection gesture");
            strategy.cancel_interaction(canvas);
            if let EditMode::CreateConnection { connector, .. } = self.mode {
                canvas.remove_shape(&connector);
            }
        }
        self.reset_edit_mode(canvas);
    }

    /// Decorations for the current mode, strategy preview first
    pub fn decorations(&self, canvas: &Canvas) -> Vec<HandleDecoration> {
        let mut decorations = self
            .strategy
            .as_ref()
            .map(|s| s.decorations(canvas))
            .unwrap_or_default();

        let Some(shape) = self
            .mode
            .shape_under_pointer()
            .and_then(|id| canvas.document().get_shape(&id))
        else {
            return decorations;
        };

        let active = self.mode.active_handle();
        if shape.is_connector() {
            let handle = match active {
                Some(HandleHit::ConnectorHandle(handle)) => Some(handle),
                _ => None,
            };
            decorations.extend(connector_handle_decorations(canvas, shape, handle));
        } else {
            let point = match active {
                Some(HandleHit::ConnectionPoint(point)) => Some(point),
                _ => None,
            };
            decorations.extend(connection_point_decorations(canvas, shape, point));
        }
        decorations
    }

    /// Paint decorations into a view-space scene
    pub fn paint(&self, canvas: &Canvas, scene: &mut Scene) {
        render_decorations(&self.decorations(canvas), scene);
    }

    /// Invalidate the area covered by the current decorations
    pub fn repaint_decorations(&self, canvas: &mut Canvas) {
        let Some(shape) = self
            .mode
            .shape_under_pointer()
            .and_then(|id| canvas.document().get_shape(&id))
        else {
            return;
        };

        let mut regions = vec![shape.bounding_rect()];
        if shape.is_connector() {
            if let Some(HandleHit::ConnectorHandle(handle)) = self.mode.active_handle() {
                if let Some(position) = shape.handle_in_document(handle) {
                    regions.push(canvas.handle_paint_rect(position));
                }
            }
        } else {
            let points = shape
                .connection_points()
                .keys()
                .filter_map(|id| shape.connection_point_in_document(*id))
                .map(|p| canvas.handle_grab_rect(p))
                .reduce(|a, b| a.union(b));
            regions.extend(points);
        }

        for region in regions {
            canvas.update_rect(region);
        }
    }

    pub fn mouse_press_event(&mut self, canvas: &mut Canvas, event: &PointerEvent) {
        match self.mode {
            EditMode::EditConnection { connector, handle } => {
                match ConnectionHandleStrategy::new(canvas, connector, handle) {
                    Some(strategy) => {
                        log::debug!("Dragging handle {} of connector {}", handle, connector);
                        self.strategy = Some(Box::new(strategy));
                    }
                    None => log::warn!("Connector {} has no handle {}", connector, handle),
                }
            }
            EditMode::EditConnectionPoint { shape, point } => {
                self.begin_connection(canvas, shape, point);
            }
            _ => {
                log::trace!("Press at {:?} ignored in {:?}", event.point, self.mode);
            }
        }
    }

    pub fn mouse_move_event(&mut self, canvas: &mut Canvas, event: &PointerEvent) {
        if self.strategy.is_some() {
            self.repaint_decorations(canvas);
            if let Some(strategy) = self.strategy.as_mut() {
                strategy.handle_mouse_move(canvas, event.point, event.modifiers);
            }
            self.repaint_decorations(canvas);
            return;
        }

        self.repaint_decorations(canvas);
        let mode = EditMode::from_hover(hover_target(canvas, event.point));
        if mode != self.mode {
            log::trace!("Connection tool mode {:?}", mode);
        }
        self.mode = mode;
        self.update_status_text(canvas);
        self.repaint_decorations(canvas);
    }

    pub fn mouse_release_event(&mut self, canvas: &mut Canvas, event: &PointerEvent) {
        let Some(mut strategy) = self.strategy.take() else {
            return;
        };

        if let EditMode::CreateConnection {
            connector, origin, ..
        } = self.mode
        {
            if self.connection_too_short(canvas, &connector) {
                log::debug!("Connection too short, discarding connector {}", connector);
                strategy.cancel_interaction(canvas);
                self.repaint_decorations(canvas);
                canvas.remove_shape(&connector);
                self.mode = EditMode::EditConnectionPoint {
                    shape: origin.shape_id,
                    point: origin.point_id,
                };
                self.repaint_decorations(canvas);
                return;
            }
            if let Some(command) = canvas.add_shape_command(&connector) {
                canvas.add_command(command);
            }
        }

        strategy.finish_interaction(canvas, event.modifiers);
        if let Some(command) = strategy.create_command(canvas) {
            canvas.add_command(command);
        }
        self.repaint_decorations(canvas);
        self.reset_edit_mode(canvas);
    }

    pub fn mouse_double_click_event(&mut self, canvas: &mut Canvas, event: &PointerEvent) {
        match self.mode {
            EditMode::EditConnectionPoint { shape, .. } => {
                let hit = canvas
                    .document()
                    .get_shape(&shape)
                    .and_then(|s| handle_at_point(canvas, s, event.point));
                self.repaint_decorations(canvas);
                if let Some(HandleHit::ConnectionPoint(point)) = hit {
                    log::debug!("Removing connection point {} of shape {}", point, shape);
                    canvas.add_command(Box::new(RemoveConnectionPointAction::new(shape, point)));
                }
                self.mode = EditMode::Idle { hover: None };
                self.update_status_text(canvas);
            }
            EditMode::Idle { hover: Some(id) } => {
                let Some(local) = canvas
                    .document()
                    .get_shape(&id)
                    .filter(|s| !s.is_connector())
                    .map(|s| s.document_to_shape(event.point))
                else {
                    return;
                };
                log::debug!("Adding connection point to shape {} at {:?}", id, local);
                canvas.add_command(Box::new(AddConnectionPointAction::new(id, local)));
                self.repaint_decorations(canvas);
            }
            _ => {}
        }
    }

    pub fn key_press_event(&mut self, canvas: &mut Canvas, event: &KeyEvent) {
        if event.key == Key::Escape {
            self.deactivate(canvas);
        }
    }

    /// Create a connector bound to a connection point and start dragging its far end
    fn begin_connection(
        &mut self,
        canvas: &mut Canvas,
        shape_id: Uuid,
        point_id: ConnectionPointId,
    ) {
        let type_id = canvas.resources.connector_type.clone();
        let Some(mut shape) = canvas
            .registry
            .create_default_shape(&type_id, &canvas.resources)
        else {
            log::warn!("No shape factory registered for {:?}", type_id);
            return;
        };
        if !shape.is_connector() {
            log::warn!("Shape type {:?} is not a connector", type_id);
            return;
        }

        let origin = Binding::new(shape_id, point_id);
        let position = match canvas.document().resolve_binding(&shape.id, origin) {
            Ok(position) => position,
            Err(err) => {
                log::warn!("Can not start connection: {}", err);
                return;
            }
        };

        let handle = shape
            .as_connector()
            .map_or(1, |c| c.handle_of(Endpoint::Second));
        shape.move_handle(0, position);
        shape.move_handle(handle, position);
        if let Some(connector) = shape.as_connector_mut() {
            connector.set_binding(Endpoint::First, Some(origin));
        }
        shape.z_index = canvas.document().next_z_index();

        self.repaint_decorations(canvas);
        let connector_id = canvas.add_shape(shape);
        let Some(strategy) = ConnectionHandleStrategy::new(canvas, connector_id, handle) else {
            canvas.remove_shape(&connector_id);
            return;
        };

        log::debug!("Creating connector {} from {:?}", connector_id, origin);
        self.strategy = Some(Box::new(strategy));
        self.mode = EditMode::CreateConnection {
            connector: connector_id,
            handle,
            origin,
        };
        self.repaint_decorations(canvas);
    }

    /// Whether the endpoints of a new connector are within grab distance
    fn connection_too_short(&self, canvas: &Canvas, connector_id: &Uuid) -> bool {
        let Some(shape) = canvas.document().get_shape(connector_id) else {
            return true;
        };
        let Some(connector) = shape.as_connector() else {
            return true;
        };
        let first = shape.handle_in_document(connector.handle_of(Endpoint::First));
        let second = shape.handle_in_document(connector.handle_of(Endpoint::Second));
        match (first, second) {
            (Some(a), Some(b)) => square_distance(a, b) < canvas.square_grab_distance(),
            _ => true,
        }
    }

    fn update_status_text(&self, canvas: &mut Canvas) {
        let hovering_connector = self
            .mode
            .shape_under_pointer()
            .and_then(|id| canvas.document().get_shape(&id))
            .is_some_and(|s| s.is_connector());
        canvas.set_status_text(self.mode.status_hint(hovering_connector));
    }

    fn reset_edit_mode(&mut self, canvas: &mut Canvas) {
        self.mode = EditMode::Idle { hover: None };
        canvas.set_status_text("");
    }
}
