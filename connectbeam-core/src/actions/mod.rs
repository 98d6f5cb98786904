//! Action implementations for document editing
//!
//! This module contains all the concrete action types that can be executed
//! through the action system.

pub mod add_shape;
pub mod change_connection;
pub mod connection_points;

pub use add_shape::AddShapeAction;
pub use change_connection::{ChangeConnectionAction, HandleState};
pub use connection_points::{AddConnectionPointAction, RemoveConnectionPointAction};
