//! Structural change notifications
//!
//! Operations post a [`Message`] for every component or loadout they touch.
//! Presentation and metrics layers subscribe through the [`MessageBus`].

pub mod bus;

pub use bus::{MessageBus, MessageFilter, SubscriptionId};

use crate::core::types::{Location, LoadoutId};

/// What changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    ItemAdded,
    ItemRemoved,
    ArmorChanged,
    /// Free tonnage changed; automatic armor should be redistributed
    ArmorDistributionUpdateRequest,
    UpgradeChanged,
    Renamed,
}

/// A change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub loadout: LoadoutId,
    /// Affected component; `None` for loadout-wide changes
    pub location: Option<Location>,
    pub kind: ChangeKind,
}
