//! Connection point actions
//!
//! Adding and removing connection points on a shape. Removing a point
//! also remembers which connector endpoints were bound to it so undo can
//! restore the bindings.

use crate::action::Action;
use crate::connector::{Binding, ConnectionPointId, Endpoint};
use crate::document::Document;
use kurbo::Point;
use uuid::Uuid;

/// Action that adds a connection point to a shape
pub struct AddConnectionPointAction {
    shape_id: Uuid,
    /// Position in the shape's local space
    position: Point,
    /// Id assigned on first execution, reused on redo
    point_id: Option<ConnectionPointId>,
}

impl AddConnectionPointAction {
    pub fn new(shape_id: Uuid, position: Point) -> Self {
        Self {
            shape_id,
            position,
            point_id: None,
        }
    }

    /// Id of the added point, once executed
    pub fn point_id(&self) -> Option<ConnectionPointId> {
        self.point_id
    }
}

impl Action for AddConnectionPointAction {
    fn execute(&mut self, document: &mut Document) {
        let position = self.position;
        let known_id = self.point_id;
        let mut assigned = None;
        document.modify_shape_internal(&self.shape_id, |shape| {
            assigned = match known_id {
                Some(id) => {
                    shape.insert_connection_point(id, position);
                    Some(id)
                }
                None => shape.add_connection_point(position),
            };
        });
        if assigned.is_some() {
            self.point_id = assigned;
        }
    }

    fn rollback(&mut self, document: &mut Document) {
        if let Some(id) = self.point_id {
            document.modify_shape_internal(&self.shape_id, |shape| {
                shape.remove_connection_point(id);
            });
        }
    }

    fn description(&self) -> String {
        "Add connection point".to_string()
    }
}

/// Action that removes a connection point from a shape
pub struct RemoveConnectionPointAction {
    shape_id: Uuid,
    point_id: ConnectionPointId,
    /// Position before removal
    removed: Option<Point>,
    /// Connector endpoints that were bound to the point
    detached: Vec<(Uuid, Endpoint)>,
}

impl RemoveConnectionPointAction {
    pub fn new(shape_id: Uuid, point_id: ConnectionPointId) -> Self {
        Self {
            shape_id,
            point_id,
            removed: None,
            detached: Vec::new(),
        }
    }
}

impl Action for RemoveConnectionPointAction {
    fn execute(&mut self, document: &mut Document) {
        let binding = Binding::new(self.shape_id, self.point_id);
        self.detached = document
            .shapes()
            .iter()
            .filter_map(|s| s.as_connector().map(|c| (s.id, c)))
            .flat_map(|(id, c)| {
                [Endpoint::First, Endpoint::Second]
                    .into_iter()
                    .filter(move |end| c.binding(*end) == Some(binding))
                    .map(move |end| (id, end))
            })
            .collect();

        let point_id = self.point_id;
        let mut removed = None;
        document.modify_shape_internal(&self.shape_id, |shape| {
            removed = shape.remove_connection_point(point_id);
        });
        if removed.is_some() {
            self.removed = removed;
        }
        for (connector_id, endpoint) in &self.detached {
            document.disconnect(connector_id, *endpoint);
        }
    }

    fn rollback(&mut self, document: &mut Document) {
        let Some(position) = self.removed else {
            return;
        };
        let point_id = self.point_id;
        document.modify_shape_internal(&self.shape_id, |shape| {
            shape.insert_connection_point(point_id, position);
        });
        let binding = Binding::new(self.shape_id, self.point_id);
        for (connector_id, endpoint) in &self.detached {
            if let Err(e) = document.connect(connector_id, *endpoint, binding) {
                log::warn!("Could not restore binding of {}: {}", connector_id, e);
            }
        }
    }

    fn description(&self) -> String {
        "Remove connection point".to_string()
    }
}
