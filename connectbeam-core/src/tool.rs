/// Connection tool modes
///
/// The mode carries the shape under the pointer and the active handle, so
/// both are cleared together whenever the tool returns to `Idle`.

use crate::connector::{Binding, ConnectionPointId};
use crate::hit_test::{HandleHit, HoverTarget};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status hint while hovering a shape that can take a new connection point
pub const HINT_ADD_CONNECTION_POINT: &str = "Double click to add connection point.";

/// Status hint while hovering a connector handle
pub const HINT_EDIT_CONNECTION: &str = "Drag to edit connection.";

/// Status hint while hovering a connection point
pub const HINT_EDIT_CONNECTION_POINT: &str =
    "Double click to remove connection point. Drag to create connection.";

/// What the connection tool is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum EditMode {
    /// Nothing grabbed; `hover` is the shape under the pointer, if any
    Idle { hover: Option<Uuid> },

    /// A connector handle is under the pointer (or being dragged)
    EditConnection { connector: Uuid, handle: usize },

    /// A connection point of a non-connector shape is under the pointer
    EditConnectionPoint {
        shape: Uuid,
        point: ConnectionPointId,
    },

    /// A new connector is being dragged out of `origin` by `handle`
    CreateConnection {
        connector: Uuid,
        handle: usize,
        origin: Binding,
    },
}

impl Default for EditMode {
    fn default() -> Self {
        Self::Idle { hover: None }
    }
}

impl EditMode {
    /// Mode for a pointer resting over `target`
    pub fn from_hover(target: HoverTarget) -> Self {
        match target {
            HoverTarget::Nothing => Self::Idle { hover: None },
            HoverTarget::Shape(id) => Self::Idle { hover: Some(id) },
            HoverTarget::ConnectorHandle { connector, handle } => {
                Self::EditConnection { connector, handle }
            }
            HoverTarget::ConnectionPoint { shape, point } => {
                Self::EditConnectionPoint { shape, point }
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }

    /// Shape whose decorations are shown
    pub fn shape_under_pointer(&self) -> Option<Uuid> {
        match *self {
            Self::Idle { hover } => hover,
            Self::EditConnection { connector, .. } => Some(connector),
            Self::EditConnectionPoint { shape, .. } => Some(shape),
            Self::CreateConnection { connector, .. } => Some(connector),
        }
    }

    /// Handle or connection point painted as active
    pub fn active_handle(&self) -> Option<HandleHit> {
        match *self {
            Self::Idle { .. } => None,
            Self::EditConnection { handle, .. } => Some(HandleHit::ConnectorHandle(handle)),
            Self::EditConnectionPoint { point, .. } => Some(HandleHit::ConnectionPoint(point)),
            Self::CreateConnection { handle, .. } => Some(HandleHit::ConnectorHandle(handle)),
        }
    }

    /// Status bar text; `hovering_connector` tells whether the hovered shape is a connector
    pub fn status_hint(&self, hovering_connector: bool) -> &'static str {
        match self {
            Self::Idle { hover: Some(_) } if !hovering_connector => HINT_ADD_CONNECTION_POINT,
            Self::EditConnection { .. } => HINT_EDIT_CONNECTION,
            Self::EditConnectionPoint { .. } => HINT_EDIT_CONNECTION_POINT,
            _ => "",
        }
    }
}
