//! Connector facet of a shape
//!
//! A connector is a line with numbered handles. Handle 0 and the last
//! handle are endpoints; each endpoint can be bound to a connection point
//! on another shape. Handles in between are bend points.

use kurbo::{Point, Rect};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a connection point, unique within its shape
pub type ConnectionPointId = u32;

/// Reference to a connection point on a specific shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    /// Shape owning the connection point
    pub shape_id: Uuid,
    /// Connection point on that shape
    pub point_id: ConnectionPointId,
}

impl Binding {
    pub fn new(shape_id: Uuid, point_id: ConnectionPointId) -> Self {
        Self { shape_id, point_id }
    }
}

/// Which end of a connector a handle belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    First,
    Second,
}

/// Reasons a connector endpoint can not be bound
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectError {
    /// The target shape does not exist in the document
    UnknownShape(Uuid),
    /// The target shape has no connection point with this id
    UnknownConnectionPoint(Uuid, ConnectionPointId),
    /// A connector can not be bound to itself
    SelfConnection,
    /// Connectors only bind to shapes that are not connectors
    ConnectorTarget(Uuid),
    /// The shape is not a connector
    NotAConnector(Uuid),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::UnknownShape(id) => write!(f, "shape {} does not exist", id),
            ConnectError::UnknownConnectionPoint(id, point) => {
                write!(f, "shape {} has no connection point {}", id, point)
            }
            ConnectError::SelfConnection => write!(f, "a connector can not connect to itself"),
            ConnectError::ConnectorTarget(id) => {
                write!(f, "shape {} is a connector and has no connection points", id)
            }
            ConnectError::NotAConnector(id) => write!(f, "shape {} is not a connector", id),
        }
    }
}

impl std::error::Error for ConnectError {}

/// Connector geometry and endpoint bindings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Handle positions in shape space, at least two
    #[serde(deserialize_with = "deserialize_handles")]
    handles: Vec<Point>,

    /// Binding of handle 0
    #[serde(default)]
    pub first: Option<Binding>,

    /// Binding of the last handle
    #[serde(default)]
    pub second: Option<Binding>,
}

impl Connector {
    /// Create a straight connector between two shape-space points
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            handles: vec![start, end],
            first: None,
            second: None,
        }
    }

    /// Create a connector with bend points
    ///
    /// Fewer than two handles are padded by repeating the last one (or the
    /// origin) so the connector always has two endpoints.
    pub fn with_handles(handles: Vec<Point>) -> Self {
        Self {
            handles: pad_handles(handles),
            first: None,
            second: None,
        }
    }

    /// Number of handles
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// All handle positions in shape space
    pub fn handles(&self) -> &[Point] {
        &self.handles
    }

    /// Position of a handle in shape space
    pub fn handle_position(&self, handle: usize) -> Option<Point> {
        self.handles.get(handle).copied()
    }

    /// Set a handle position in shape space
    ///
    /// Returns false if the handle does not exist.
    pub fn set_handle_position(&mut self, handle: usize, position: Point) -> bool {
        match self.handles.get_mut(handle) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    /// Index of the last handle
    pub fn last_handle(&self) -> usize {
        self.handles.len().saturating_sub(1)
    }

    /// Which endpoint a handle is, if any
    pub fn endpoint_of(&self, handle: usize) -> Option<Endpoint> {
        if handle == 0 {
            Some(Endpoint::First)
        } else if handle == self.last_handle() {
            Some(Endpoint::Second)
        } else {
            None
        }
    }

    /// Handle index of an endpoint
    pub fn handle_of(&self, endpoint: Endpoint) -> usize {
        match endpoint {
            Endpoint::First => 0,
            Endpoint::Second => self.last_handle(),
        }
    }

    /// Binding of an endpoint
    pub fn binding(&self, endpoint: Endpoint) -> Option<Binding> {
        match endpoint {
            Endpoint::First => self.first,
            Endpoint::Second => self.second,
        }
    }

    /// Replace the binding of an endpoint
    pub fn set_binding(&mut self, endpoint: Endpoint, binding: Option<Binding>) {
        match endpoint {
            Endpoint::First => self.first = binding,
            Endpoint::Second => self.second = binding,
        }
    }

    /// Binding of the handle, if it is a bound endpoint
    pub fn handle_binding(&self, handle: usize) -> Option<Binding> {
        self.endpoint_of(handle).and_then(|end| self.binding(end))
    }

    /// First handle lying inside `rect` (shape space)
    pub fn handle_id_at(&self, rect: Rect) -> Option<usize> {
        self.handles.iter().position(|p| rect.contains(*p))
    }

    /// Bounding box of all handles in shape space
    pub fn bounding_box(&self) -> Rect {
        let mut iter = self.handles.iter();
        let first = iter.next().copied().unwrap_or(Point::ORIGIN);
        iter.fold(Rect::from_points(first, first), |rect, p| rect.union_pt(*p))
    }
}

fn pad_handles(mut handles: Vec<Point>) -> Vec<Point> {
    while handles.len() < 2 {
        let last = handles.last().copied().unwrap_or(Point::ORIGIN);
        handles.push(last);
    }
    handles
}

fn deserialize_handles<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Point>::deserialize(deserializer).map(pad_handles)
}
