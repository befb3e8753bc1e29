//! Equipment items
//!
//! An [`Item`] is an immutable catalog value. Behavior that differs between
//! item families is keyed off the [`ItemKind`] discriminant rather than a
//! type hierarchy.

use serde::{Deserialize, Serialize};

use crate::core::types::{HardpointType, ItemId, Location};

/// Engine rating covered by each built-in heat sink
const RATING_PER_ENGINE_HEAT_SINK: u32 = 25;

/// Heat sinks an engine holds without exposing slots for them
const BUILT_IN_ENGINE_HEAT_SINKS: u32 = 10;

/// Coarse item family, used for filtering and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Internal,
    HeatSink,
    Engine,
    JumpJet,
    Ammo,
    Weapon,
    Module,
}

/// Family-specific data of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ItemKind {
    /// Fixed equipment such as actuators, gyro or engine side shielding
    Internal,
    HeatSink {
        dissipation: f64,
    },
    Engine {
        rating: u32,
        /// Slots the engine occupies in each side torso (XL-type engines)
        #[serde(default)]
        side_slots: u32,
        /// Internal item mirrored into both side torsos (XL-type engines)
        #[serde(default)]
        side_internal: Option<ItemId>,
    },
    JumpJet {
        /// Lightest chassis this jump jet can be mounted on
        min_tons: f64,
        /// Heaviest chassis this jump jet can be mounted on
        max_tons: f64,
    },
    Ammo,
    Weapon,
    Module,
}

/// An immutable catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Mass in tons
    pub mass: f64,
    /// Critical slots consumed
    pub slots: u32,
    #[serde(default)]
    pub hardpoint: HardpointType,
    /// Locations the item may be mounted in; empty means anywhere
    #[serde(default)]
    pub locations: Vec<Location>,
    /// At most one per component (CASE and similar)
    #[serde(default)]
    pub unique: bool,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: &str, name: &str, mass: f64, slots: u32, kind: ItemKind) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            mass,
            slots,
            hardpoint: HardpointType::None,
            locations: Vec::new(),
            unique: false,
            kind,
        }
    }

    pub fn with_hardpoint(mut self, hardpoint: HardpointType) -> Self {
        self.hardpoint = hardpoint;
        self
    }

    pub fn with_locations(mut self, locations: &[Location]) -> Self {
        self.locations = locations.to_vec();
        self
    }

    pub fn unique_per_component(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn category(&self) -> ItemCategory {
        match self.kind {
            ItemKind::Internal => ItemCategory::Internal,
            ItemKind::HeatSink { .. } => ItemCategory::HeatSink,
            ItemKind::Engine { .. } => ItemCategory::Engine,
            ItemKind::JumpJet { .. } => ItemCategory::JumpJet,
            ItemKind::Ammo => ItemCategory::Ammo,
            ItemKind::Weapon => ItemCategory::Weapon,
            ItemKind::Module => ItemCategory::Module,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind, ItemKind::Internal)
    }

    pub fn is_heat_sink(&self) -> bool {
        matches!(self.kind, ItemKind::HeatSink { .. })
    }

    pub fn is_engine(&self) -> bool {
        matches!(self.kind, ItemKind::Engine { .. })
    }

    pub fn is_jump_jet(&self) -> bool {
        matches!(self.kind, ItemKind::JumpJet { .. })
    }

    /// Engine rating, if this is an engine
    pub fn engine_rating(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Engine { rating, .. } => Some(rating),
            _ => None,
        }
    }

    /// Number of heat sinks that can ride inside this engine at no slot cost.
    ///
    /// Zero for anything that is not an engine.
    pub fn heat_sink_capacity(&self) -> u32 {
        match self.kind {
            ItemKind::Engine { rating, .. } => {
                (rating / RATING_PER_ENGINE_HEAT_SINK).saturating_sub(BUILT_IN_ENGINE_HEAT_SINKS)
            }
            _ => 0,
        }
    }

    /// Slots taken in each side torso by an XL-type engine
    pub fn side_slots(&self) -> u32 {
        match self.kind {
            ItemKind::Engine { side_slots, .. } => side_slots,
            _ => 0,
        }
    }

    /// Internal item mirrored into both side torsos, if any
    pub fn side_internal(&self) -> Option<&ItemId> {
        match &self.kind {
            ItemKind::Engine { side_internal, .. } => side_internal.as_ref(),
            _ => None,
        }
    }

    /// Whether the engine also occupies both side torsos
    pub fn is_xl_engine(&self) -> bool {
        self.side_internal().is_some()
    }

    /// Whether this item may be mounted in `location`
    pub fn allowed_in(&self, location: Location) -> bool {
        self.locations.is_empty() || self.locations.contains(&location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rating: u32) -> Item {
        Item::new(
            "engine",
            "Engine",
            10.0,
            6,
            ItemKind::Engine {
                rating,
                side_slots: 0,
                side_internal: None,
            },
        )
    }

    #[test]
    fn test_heat_sink_capacity_from_rating() {
        assert_eq!(engine(300).heat_sink_capacity(), 2);
        assert_eq!(engine(250).heat_sink_capacity(), 0);
        assert_eq!(engine(200).heat_sink_capacity(), 0);
        assert_eq!(engine(400).heat_sink_capacity(), 6);
    }

    #[test]
    fn test_non_engine_has_no_capacity() {
        let laser = Item::new("laser", "Laser", 1.0, 1, ItemKind::Weapon);
        assert_eq!(laser.heat_sink_capacity(), 0);
        assert_eq!(laser.engine_rating(), None);
        assert!(!laser.is_xl_engine());
    }

    #[test]
    fn test_allowed_locations() {
        let case = Item::new("case", "CASE", 0.5, 1, ItemKind::Module)
            .with_locations(&[Location::LeftTorso, Location::RightTorso]);
        assert!(case.allowed_in(Location::LeftTorso));
        assert!(!case.allowed_in(Location::Head));

        let laser = Item::new("laser", "Laser", 1.0, 1, ItemKind::Weapon);
        assert!(laser.allowed_in(Location::Head));
    }

    #[test]
    fn test_category_follows_kind() {
        assert_eq!(engine(300).category(), ItemCategory::Engine);
        let hs = Item::new("hs", "Heat Sink", 1.0, 1, ItemKind::HeatSink { dissipation: 0.1 });
        assert_eq!(hs.category(), ItemCategory::HeatSink);
        assert!(hs.is_heat_sink());
    }
}
