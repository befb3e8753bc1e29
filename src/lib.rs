//! Loadout Core - equipment validation and undoable editing for chassis builds

pub mod catalog;
pub mod core;
pub mod loadout;
pub mod messages;
pub mod ops;

#[cfg(test)]
mod testing;

pub use crate::catalog::Catalog;
pub use crate::core::{EditorConfig, LoadoutError, Result};
pub use crate::loadout::Loadout;
pub use crate::messages::{MessageBus, MessageFilter};
pub use crate::ops::{EditContext, Operation, OperationStack};
