//! Interaction strategies
//!
//! A strategy owns one drag gesture from press to release. It edits the
//! document live while the pointer moves and hands back an undoable action
//! when the gesture is finished.

use crate::action::Action;
use crate::actions::{ChangeConnectionAction, HandleState};
use crate::canvas::Canvas;
use crate::connector::{Binding, Endpoint};
use crate::decorations::{snap_target_decoration, HandleDecoration};
use crate::hit_test::nearest_connection_point;
use crate::input::Modifiers;
use kurbo::{Point, Vec2};
use std::f64::consts::FRAC_PI_4;
use uuid::Uuid;

/// One drag gesture
pub trait InteractionStrategy {
    /// Pointer moved to `point` (document coordinates)
    fn handle_mouse_move(&mut self, canvas: &mut Canvas, point: Point, modifiers: Modifiers);

    /// Pointer released; record the final state
    fn finish_interaction(&mut self, canvas: &mut Canvas, modifiers: Modifiers);

    /// Undo every live edit made so far
    fn cancel_interaction(&mut self, canvas: &mut Canvas);

    /// Action for the whole gesture, if it changed anything
    fn create_command(&mut self, canvas: &Canvas) -> Option<Box<dyn Action>>;

    /// Preview painted on top of the tool decorations
    fn decorations(&self, _canvas: &Canvas) -> Vec<HandleDecoration> {
        Vec::new()
    }
}

/// Rotate `point` around `anchor` onto the nearest multiple of 45 degrees
pub fn constrain_to_45_degrees(anchor: Point, point: Point) -> Point {
    let delta = point - anchor;
    let length = delta.hypot();
    if length <= f64::EPSILON {
        return point;
    }
    let angle = (delta.atan2() / FRAC_PI_4).round() * FRAC_PI_4;
    anchor + Vec2::from_angle(angle) * length
}

/// Drags one connector handle, snapping endpoints onto connection points
pub struct ConnectionHandleStrategy {
    connector_id: Uuid,
    handle: usize,
    endpoint: Option<Endpoint>,
    original: HandleState,
    finished: Option<HandleState>,
    snap_target: Option<Binding>,
}

impl ConnectionHandleStrategy {
    /// Start dragging `handle` of a connector registered with the canvas
    pub fn new(canvas: &Canvas, connector_id: Uuid, handle: usize) -> Option<Self> {
        let original = HandleState::capture(canvas.document(), &connector_id, handle)?;
        let endpoint = canvas
            .document()
            .get_shape(&connector_id)?
            .as_connector()?
            .endpoint_of(handle);
        Some(Self {
            connector_id,
            handle,
            endpoint,
            original,
            finished: None,
            snap_target: original.binding,
        })
    }

    /// Topmost connection point in reach of `point`, with its document position
    fn find_snap_target(&self, canvas: &Canvas, point: Point) -> Option<(Binding, Point)> {
        let max_square_distance = canvas.square_grab_distance();
        let shapes = canvas.shapes_at(canvas.handle_grab_rect(point));

        shapes
            .iter()
            .rev()
            .filter(|s| s.id != self.connector_id && !s.is_connector())
            .find_map(|shape| {
                let local = shape.document_to_shape(point);
                let id = nearest_connection_point(shape, local, max_square_distance)?;
                let position = shape.connection_point_in_document(id)?;
                Some((Binding::new(shape.id, id), position))
            })
    }

    /// Document position of the endpoint opposite to the dragged one
    fn opposite_endpoint(&self, canvas: &Canvas, endpoint: Endpoint) -> Option<Point> {
        let shape = canvas.document().get_shape(&self.connector_id)?;
        let connector = shape.as_connector()?;
        let opposite = match endpoint {
            Endpoint::First => connector.handle_of(Endpoint::Second),
            Endpoint::Second => connector.handle_of(Endpoint::First),
        };
        shape.handle_in_document(opposite)
    }
}

impl InteractionStrategy for ConnectionHandleStrategy {
    fn handle_mouse_move(&mut self, canvas: &mut Canvas, point: Point, modifiers: Modifiers) {
        let mut target = point;
        let mut binding = None;

        if let Some(endpoint) = self.endpoint {
            match self.find_snap_target(canvas, point) {
                Some((snap, position)) => {
                    binding = Some(snap);
                    target = position;
                }
                None if modifiers.shift => {
                    if let Some(anchor) = self.opposite_endpoint(canvas, endpoint) {
                        target = constrain_to_45_degrees(anchor, point);
                    }
                }
                None => {}
            }
        }

        canvas.update_shape(&self.connector_id);

        let handle = self.handle;
        let endpoint = self.endpoint;
        canvas
            .document_mut()
            .modify_shape_internal(&self.connector_id, |shape| {
                shape.move_handle(handle, target);
                if let (Some(endpoint), Some(connector)) = (endpoint, shape.as_connector_mut()) {
                    connector.set_binding(endpoint, binding);
                }
            });

        if binding != self.snap_target {
            log::trace!(
                "Connector {} handle {} snap target {:?}",
                self.connector_id,
                self.handle,
                binding
            );
        }
        self.snap_target = binding;

        canvas.update_shape(&self.connector_id);
    }

    fn finish_interaction(&mut self, canvas: &mut Canvas, _modifiers: Modifiers) {
        self.finished = HandleState::capture(canvas.document(), &self.connector_id, self.handle);
    }

    fn cancel_interaction(&mut self, canvas: &mut Canvas) {
        canvas.update_shape(&self.connector_id);
        self.original
            .apply(canvas.document_mut(), &self.connector_id, self.handle);
        self.snap_target = self.original.binding;
        self.finished = None;
    }

    fn create_command(&mut self, canvas: &Canvas) -> Option<Box<dyn Action>> {
        let new = self
            .finished
            .or_else(|| HandleState::capture(canvas.document(), &self.connector_id, self.handle))?;
        if new == self.original {
            return None;
        }
        Some(Box::new(ChangeConnectionAction::new(
            self.connector_id,
            self.handle,
            self.original,
            new,
        )))
    }

    fn decorations(&self, canvas: &Canvas) -> Vec<HandleDecoration> {
        let Some(binding) = self.snap_target else {
            return Vec::new();
        };
        canvas
            .document()
            .get_shape(&binding.shape_id)
            .and_then(|shape| shape.connection_point_in_document(binding.point_id))
            .map(|position| vec![snap_target_decoration(canvas, position)])
            .unwrap_or_default()
    }
}
