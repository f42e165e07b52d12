//! Per-frame undo/redo history.

use crate::canvas::SurfaceRegistry;
use crate::command::{Command, CommandError};

/// Linear undo/redo stacks of commands.
///
/// Recording a new command clears the redo stack; there is no branching.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a completed user action.
    ///
    /// Preview commands are transient and are dropped here.
    pub fn record(&mut self, command: Command) {
        if command.is_preview() {
            log::warn!("Refusing to record preview command {}", command.id());
            return;
        }
        log::debug!("Recorded command {}", command.id());
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Undo the most recent command. Returns whether anything was undone.
    pub fn undo(&mut self, surfaces: &mut SurfaceRegistry) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        if let Err(e) = command.cancel(surfaces) {
            report(&command, e);
        }
        self.redo_stack.push(command);
        true
    }

    /// Redo the most recently undone command. Returns whether anything was
    /// redone.
    pub fn redo(&mut self, surfaces: &mut SurfaceRegistry) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        if let Err(e) = command.execute(surfaces) {
            report(&command, e);
        }
        self.undo_stack.push(command);
        true
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

fn report(command: &Command, error: CommandError) {
    if error == CommandError::NoCanvasBound {
        log::warn!("Command {} has no canvas: {}", command.id(), error);
        return;
    }
    log::error!("Command {} out of sync with canvas: {}", command.id(), error);
    debug_assert!(
        matches!(error, CommandError::NoCanvasBound),
        "history out of sync with canvas: {error}"
    );
}
