//! Change connection action
//!
//! Records one dragged connector handle: where it was, where it ended up,
//! and the binding of the endpoint before and after.

use crate::action::Action;
use crate::connector::Binding;
use crate::document::Document;
use kurbo::Point;
use uuid::Uuid;

/// Position and binding of one connector handle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleState {
    /// Handle position in the connector's shape space
    pub position: Point,
    /// Binding of the handle, if it is a bound endpoint
    pub binding: Option<Binding>,
}

impl HandleState {
    /// Capture the state of a handle from the document
    pub fn capture(document: &Document, connector_id: &Uuid, handle: usize) -> Option<Self> {
        let connector = document.get_shape(connector_id)?.as_connector()?;
        Some(Self {
            position: connector.handle_position(handle)?,
            binding: connector.handle_binding(handle),
        })
    }

    /// Write this state into the document
    pub(crate) fn apply(&self, document: &mut Document, connector_id: &Uuid, handle: usize) {
        let state = *self;
        document.modify_shape_internal(connector_id, |shape| {
            if let Some(connector) = shape.as_connector_mut() {
                connector.set_handle_position(handle, state.position);
                if let Some(endpoint) = connector.endpoint_of(handle) {
                    connector.set_binding(endpoint, state.binding);
                }
            }
        });
    }
}

/// Action that moves a connector handle and rebinds its endpoint
pub struct ChangeConnectionAction {
    connector_id: Uuid,
    handle: usize,
    old: HandleState,
    new: HandleState,
}

impl ChangeConnectionAction {
    pub fn new(connector_id: Uuid, handle: usize, old: HandleState, new: HandleState) -> Self {
        Self {
            connector_id,
            handle,
            old,
            new,
        }
    }
}

impl Action for ChangeConnectionAction {
    fn execute(&mut self, document: &mut Document) {
        self.new.apply(document, &self.connector_id, self.handle);
    }

    fn rollback(&mut self, document: &mut Document) {
        self.old.apply(document, &self.connector_id, self.handle);
    }

    fn description(&self) -> String {
        "Change connection".to_string()
    }
}
