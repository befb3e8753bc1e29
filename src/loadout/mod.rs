//! Loadout state, fit rules and dynamic slot placement

pub mod aggregate;
pub mod component;
pub mod dynamic_slots;
pub mod rules;

pub use aggregate::Loadout;
pub use component::ComponentState;
pub use dynamic_slots::{DynamicSlotDistributor, DynamicSlots};
