//! Undo/redo history
//!
//! The stack keeps a list of history entries and a cursor. Entries before
//! the cursor are undoable, entries at or after it are redoable. Pushing a
//! new operation drops the redo tail.
//!
//! ```text
//! entries: [ e0 | e1 | e2 | e3 ]
//!                      ^ cursor = 2 (e0, e1 undoable; e2, e3 redoable)
//! ```
//!
//! An entry normally holds one operation. Operations that report
//! [`Operation::can_coalesce`] with the top entry's last operation are merged
//! into it, so a slider drag becomes a single undo step.

use crate::core::config::EditorConfig;
use crate::core::error::Result;
use crate::ops::{apply_all, undo_all, EditContext, Operation};

/// One undo step
#[derive(Debug)]
struct HistoryEntry {
    ops: Vec<Box<dyn Operation>>,
}

impl HistoryEntry {
    fn describe(&self) -> String {
        self.ops.last().map(|op| op.describe()).unwrap_or_default()
    }
}

/// Linear undo/redo history of applied operations
#[derive(Debug)]
pub struct OperationStack {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    depth: usize,
}

impl Default for OperationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationStack {
    pub fn new() -> Self {
        Self::with_depth(EditorConfig::default().history_depth)
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self::with_depth(config.history_depth)
    }

    /// History keeping at most `depth` undo steps (at least one)
    pub fn with_depth(depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            depth: depth.max(1),
        }
    }

    /// Apply `op` and record it.
    ///
    /// If `apply` fails the error is returned and the history is untouched.
    pub fn push(&mut self, mut op: Box<dyn Operation>, ctx: &mut EditContext<'_>) -> Result<()> {
        op.apply(ctx)?;

        if self.cursor < self.entries.len() {
            tracing::debug!(
                "Dropping {} redo entries",
                self.entries.len() - self.cursor
            );
            self.entries.truncate(self.cursor);
        }

        let coalesce = self
            .entries
            .last()
            .and_then(|entry| entry.ops.last())
            .is_some_and(|previous| op.can_coalesce(previous.as_ref()));

        if coalesce {
            tracing::trace!("Coalescing {}", op.describe());
            if let Some(entry) = self.entries.last_mut() {
                entry.ops.push(op);
            }
        } else {
            tracing::trace!("Pushing {}", op.describe());
            self.entries.push(HistoryEntry { ops: vec![op] });
            self.cursor += 1;
        }

        if self.entries.len() > self.depth {
            let excess = self.entries.len() - self.depth;
            self.entries.drain(..excess);
            self.cursor -= excess;
        }
        Ok(())
    }

    /// Undo the most recent entry. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        let entry = &mut self.entries[self.cursor - 1];
        tracing::debug!("Undo {}", entry.describe());
        undo_all(&mut entry.ops, ctx)?;
        self.cursor -= 1;
        Ok(true)
    }

    /// Re-apply the next undone entry. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, ctx: &mut EditContext<'_>) -> Result<bool> {
        let Some(entry) = self.entries.get_mut(self.cursor) else {
            return Ok(false);
        };
        tracing::debug!("Redo {}", entry.describe());
        apply_all(&mut entry.ops, ctx)?;
        self.cursor += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .map(|index| self.entries[index].describe())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.entries.get(self.cursor).map(HistoryEntry::describe)
    }

    /// Number of recorded undo steps, including redoable ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
