// Connectbeam Core Library
// Shape model, undo actions and the connection editing tool

pub mod object;
pub mod connector;
pub mod shape;
pub mod document;
pub mod action;
pub mod actions;
pub mod resources;
pub mod registry;
pub mod view;
pub mod input;
pub mod canvas;
pub mod decorations;
pub mod strategy;
pub mod tool;
pub mod connection_tool;

pub use canvas::{Canvas, CursorShape};
pub use connection_tool::ConnectionTool;
pub use connector::{Binding, ConnectError, ConnectionPointId, Connector, Endpoint};
pub use document::Document;
pub use shape::{Shape, ShapeColor, ShapeKind};
pub use tool::EditMode;
