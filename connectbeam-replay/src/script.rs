//! Event scripts
//!
//! A script is a list of pointer, key and history events. Replaying it
//! feeds every event to a [`ConnectionTool`] bound to a fresh canvas and
//! records what the tool left behind.

use anyhow::Context;
use connectbeam_core::canvas::Canvas;
use connectbeam_core::connection_tool::ConnectionTool;
use connectbeam_core::document::Document;
use connectbeam_core::input::{Key, KeyEvent, Modifiers, PointerEvent};
use connectbeam_core::resources::ToolResources;
use connectbeam_core::tool::EditMode;
use connectbeam_core::view::ViewConverter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ScriptEvent {
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Release {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: Key,
    },
    Undo,
    Redo,
    Activate,
    Deactivate,
}

/// Ordered list of events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing script")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("in {}", path.display()))
    }
}

/// Everything a replay produced
#[derive(Debug, Serialize)]
pub struct Report {
    pub document: Document,
    pub mode: EditMode,
    pub status_text: String,
    pub undo_history: Vec<String>,
    pub redo_depth: usize,
    /// Decorations that would be painted after the last event
    pub decoration_count: usize,
}

/// Replays a script against a canvas
pub struct Replay {
    canvas: Canvas,
    tool: ConnectionTool,
}

impl Replay {
    /// Bind a new tool to a canvas showing `document`; the tool is activated
    pub fn new(document: Document, resources: ToolResources, view: ViewConverter) -> Self {
        let mut canvas = Canvas::new(document)
            .with_resources(resources)
            .with_view(view);
        let mut tool = ConnectionTool::new();
        tool.activate(&mut canvas);
        Self { canvas, tool }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn tool(&self) -> &ConnectionTool {
        &self.tool
    }

    /// Feed one event to the tool
    pub fn apply(&mut self, event: ScriptEvent) {
        let canvas = &mut self.canvas;
        let tool = &mut self.tool;
        match event {
            ScriptEvent::Move { x, y, modifiers } => {
                tool.mouse_move_event(canvas, &pointer(x, y, modifiers));
            }
            ScriptEvent::Press { x, y, modifiers } => {
                tool.mouse_press_event(canvas, &pointer(x, y, modifiers));
            }
            ScriptEvent::Release { x, y, modifiers } => {
                tool.mouse_release_event(canvas, &pointer(x, y, modifiers));
            }
            ScriptEvent::DoubleClick { x, y, modifiers } => {
                tool.mouse_double_click_event(canvas, &pointer(x, y, modifiers));
            }
            ScriptEvent::Key { key } => tool.key_press_event(canvas, &KeyEvent::new(key)),
            ScriptEvent::Undo => {
                if !canvas.executor_mut().undo() {
                    log::info!("Nothing to undo");
                }
            }
            ScriptEvent::Redo => {
                if !canvas.executor_mut().redo() {
                    log::info!("Nothing to redo");
                }
            }
            ScriptEvent::Activate => tool.activate(canvas),
            ScriptEvent::Deactivate => tool.deactivate(canvas),
        }

        let dirty = canvas.take_dirty_regions();
        log::trace!("{:?} dirtied {} regions", event, dirty.len());
    }

    /// Feed every event of a script
    pub fn run(&mut self, script: &Script) {
        for (index, event) in script.events.iter().enumerate() {
            log::debug!("Event {}: {:?}", index, event);
            self.apply(*event);
        }
    }

    /// Deactivate the tool and collect the result
    pub fn finish(mut self) -> Report {
        let decoration_count = self.tool.decorations(&self.canvas).len();
        let mode = self.tool.mode();
        let status_text = self.canvas.status_text().to_string();
        self.tool.deactivate(&mut self.canvas);

        let executor = self.canvas.executor();
        let undo_history = executor.undo_descriptions();
        let redo_depth = executor.redo_depth();
        Report {
            document: self.canvas.document().clone(),
            mode,
            status_text,
            undo_history,
            redo_depth,
            decoration_count,
        }
    }
}

fn pointer(x: f64, y: f64, modifiers: Modifiers) -> PointerEvent {
    PointerEvent::new(x, y).with_modifiers(modifiers)
}
