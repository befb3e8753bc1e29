//! Undoable loadout edits
//!
//! Every mutation of a [`Loadout`] goes through an [`Operation`]. Leaf
//! operations capture the state they overwrite so `undo` restores it exactly;
//! composite operations apply children in order and undo them in reverse.
//!
//! ```text
//! Created ──apply──► Applied ──undo──► Undone
//!                       ▲                 │
//!                       └──────apply──────┘
//! ```

pub mod armor;
pub mod composite;
pub mod item;
pub mod rename;
pub mod stack;
pub mod strip;
pub mod upgrade;

pub use armor::{SetArmor, SymmetricArmor};
pub use composite::CompositeOperation;
pub use item::{AddItem, RemoveItem};
pub use rename::RenameLoadout;
pub use stack::OperationStack;
pub use strip::{StripComponent, StripLoadout};
pub use upgrade::{SetUpgrade, UpgradeChange};

use std::any::Any;
use std::fmt;

use crate::core::error::{LoadoutError, Result};
use crate::core::types::Location;
use crate::loadout::Loadout;
use crate::messages::{ChangeKind, Message, MessageBus};

/// The loadout being edited and where to announce changes
pub struct EditContext<'a> {
    pub loadout: &'a mut Loadout,
    messages: Option<&'a MessageBus>,
}

impl<'a> EditContext<'a> {
    /// Edit without notifications
    pub fn new(loadout: &'a mut Loadout) -> Self {
        Self {
            loadout,
            messages: None,
        }
    }

    pub fn with_messages(loadout: &'a mut Loadout, messages: &'a MessageBus) -> Self {
        Self {
            loadout,
            messages: Some(messages),
        }
    }

    pub fn post(&self, location: Option<Location>, kind: ChangeKind) {
        if let Some(bus) = self.messages {
            bus.post(Message {
                loadout: self.loadout.id(),
                location,
                kind,
            });
        }
    }
}

/// An undoable edit
pub trait Operation: fmt::Debug {
    /// Human readable summary for undo menus
    fn describe(&self) -> String;

    /// Validate against the current state, then mutate.
    ///
    /// On error the loadout is unchanged.
    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()>;

    /// Reverse the last `apply`
    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()>;

    /// Whether this edit may be merged into the history entry of `previous`
    fn can_coalesce(&self, _previous: &dyn Operation) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}

/// Lifecycle of a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Created,
    Applied,
    Undone,
}

impl OpState {
    pub(crate) fn check_apply(self, op: &str) -> Result<()> {
        if self == OpState::Applied {
            return Err(LoadoutError::InvalidState(format!("{} applied twice", op)));
        }
        Ok(())
    }

    pub(crate) fn check_undo(self, op: &str) -> Result<()> {
        if self != OpState::Applied {
            return Err(LoadoutError::InvalidState(format!(
                "{} undone while {:?}",
                op, self
            )));
        }
        Ok(())
    }
}

/// Apply `ops` in order; on failure undo the applied prefix in reverse and
/// return the original error.
pub(crate) fn apply_all(ops: &mut [Box<dyn Operation>], ctx: &mut EditContext<'_>) -> Result<()> {
    for i in 0..ops.len() {
        if let Err(err) = ops[i].apply(ctx) {
            tracing::debug!("Rolling back {} applied steps: {}", i, err);
            for applied in ops[..i].iter_mut().rev() {
                if let Err(rollback) = applied.undo(ctx) {
                    tracing::error!("Rollback of {} failed: {}", applied.describe(), rollback);
                    return Err(rollback);
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

/// Undo `ops` in reverse order
pub(crate) fn undo_all(ops: &mut [Box<dyn Operation>], ctx: &mut EditContext<'_>) -> Result<()> {
    for op in ops.iter_mut().rev() {
        op.undo(ctx)?;
    }
    Ok(())
}
