//! Undoable document edits
//!
//! Every committed change to a [`Document`] is an [`Action`]. The
//! [`ActionExecutor`] owns the document together with two history stacks;
//! outside the crate the document can only be read through it.
//!
//! The connection tool edits shapes live while the pointer is dragging
//! (through [`ActionExecutor::document_mut`]) and commits the result as one
//! action afterwards. That action's `execute()` re-applies the final state,
//! so running it on an already-edited document is a no-op.

use crate::document::Document;

/// A reversible change to the document
///
/// `execute()` may run on a document that already shows the change.
pub trait Action {
    fn execute(&mut self, document: &mut Document);

    /// Restore the document to how it was before `execute()`
    fn rollback(&mut self, document: &mut Document);

    /// Label shown in the undo history
    fn description(&self) -> String;
}

/// Owns the document and its undo/redo history
pub struct ActionExecutor {
    document: Document,
    undo_stack: Vec<Box<dyn Action>>,
    redo_stack: Vec<Box<dyn Action>>,
    /// Oldest entries are dropped past this many
    max_undo_depth: usize,
}

const DEFAULT_MAX_UNDO_DEPTH: usize = 100;

impl ActionExecutor {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_depth: DEFAULT_MAX_UNDO_DEPTH,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Unrecorded access for in-progress drags
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Apply `action` and record it
    ///
    /// Anything that could be redone is forgotten.
    pub fn execute(&mut self, mut action: Box<dyn Action>) {
        log::debug!("Executing action: {}", action.description());
        action.execute(&mut self.document);
        self.document.update_connections();

        self.redo_stack.clear();
        self.undo_stack.push(action);
        self.trim_history();
    }

    /// Roll back the newest action; false when there is none
    pub fn undo(&mut self) -> bool {
        let Some(mut action) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("Undoing action: {}", action.description());
        action.rollback(&mut self.document);
        self.document.update_connections();
        self.redo_stack.push(action);
        true
    }

    /// Re-apply the most recently undone action; false when there is none
    pub fn redo(&mut self) -> bool {
        let Some(mut action) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("Redoing action: {}", action.description());
        action.execute(&mut self.document);
        self.document.update_connections();
        self.undo_stack.push(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|action| action.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|action| action.description())
    }

    /// Labels of the undo history, oldest first
    pub fn undo_descriptions(&self) -> Vec<String> {
        self.undo_stack.iter().map(|action| action.description()).collect()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn set_max_undo_depth(&mut self, depth: usize) {
        self.max_undo_depth = depth;
        self.trim_history();
    }

    fn trim_history(&mut self) {
        let excess = self.undo_stack.len().saturating_sub(self.max_undo_depth);
        if excess > 0 {
            self.undo_stack.drain(..excess);
        }
    }
}
