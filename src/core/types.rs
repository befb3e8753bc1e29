//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a loadout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadoutId(pub Uuid);

impl LoadoutId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LoadoutId {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Catalog identifier of an item ("medium-laser", "xl-engine-300")
    ItemId
);
string_id!(
    /// Catalog identifier of a chassis
    ChassisId
);
string_id!(
    /// Catalog identifier of an upgrade of any family
    UpgradeId
);

/// One of the eight body positions of a chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Head,
    LeftArm,
    LeftTorso,
    CenterTorso,
    RightTorso,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl Location {
    /// All locations, in storage order
    pub const ALL: [Location; 8] = [
        Location::Head,
        Location::LeftArm,
        Location::LeftTorso,
        Location::CenterTorso,
        Location::RightTorso,
        Location::RightArm,
        Location::LeftLeg,
        Location::RightLeg,
    ];

    /// Order in which dynamic slots are handed out, as laid out on screen
    /// from left to right.
    pub const DYNAMIC_SLOT_ORDER: [Location; 8] = [
        Location::RightArm,
        Location::RightTorso,
        Location::RightLeg,
        Location::Head,
        Location::CenterTorso,
        Location::LeftTorso,
        Location::LeftLeg,
        Location::LeftArm,
    ];

    /// Position of this location in [`Location::ALL`]
    pub fn index(self) -> usize {
        match self {
            Location::Head => 0,
            Location::LeftArm => 1,
            Location::LeftTorso => 2,
            Location::CenterTorso => 3,
            Location::RightTorso => 4,
            Location::RightArm => 5,
            Location::LeftLeg => 6,
            Location::RightLeg => 7,
        }
    }

    /// Torsos carry front and back armor
    pub fn is_two_sided(self) -> bool {
        matches!(
            self,
            Location::LeftTorso | Location::CenterTorso | Location::RightTorso
        )
    }

    /// Armor sides valid for this location
    pub fn armor_sides(self) -> &'static [ArmorSide] {
        if self.is_two_sided() {
            &[ArmorSide::Front, ArmorSide::Back]
        } else {
            &[ArmorSide::Only]
        }
    }

    /// Whether `side` is a valid armor side here
    pub fn has_side(self, side: ArmorSide) -> bool {
        self.armor_sides().contains(&side)
    }

    /// The mirrored location on the other side of the chassis
    pub fn mirror(self) -> Option<Location> {
        match self {
            Location::LeftArm => Some(Location::RightArm),
            Location::RightArm => Some(Location::LeftArm),
            Location::LeftTorso => Some(Location::RightTorso),
            Location::RightTorso => Some(Location::LeftTorso),
            Location::LeftLeg => Some(Location::RightLeg),
            Location::RightLeg => Some(Location::LeftLeg),
            Location::Head | Location::CenterTorso => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Location::Head => "Head",
            Location::LeftArm => "Left Arm",
            Location::LeftTorso => "Left Torso",
            Location::CenterTorso => "Center Torso",
            Location::RightTorso => "Right Torso",
            Location::RightArm => "Right Arm",
            Location::LeftLeg => "Left Leg",
            Location::RightLeg => "Right Leg",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which face of a component an armor amount applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSide {
    Front,
    Back,
    /// Single-sided components (head, arms, legs)
    Only,
}

impl fmt::Display for ArmorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmorSide::Front => f.write_str("front"),
            ArmorSide::Back => f.write_str("back"),
            ArmorSide::Only => f.write_str("armor"),
        }
    }
}

/// Mount type an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HardpointType {
    /// Item needs no hardpoint
    #[default]
    None,
    Energy,
    Ballistic,
    Missile,
    AntiMissile,
    Ecm,
}

/// Tolerance for tonnage comparisons
pub const MASS_EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, location) in Location::ALL.iter().enumerate() {
            assert_eq!(location.index(), i);
        }
    }

    #[test]
    fn test_mirror_is_involution() {
        for location in Location::ALL {
            if let Some(mirror) = location.mirror() {
                assert_eq!(mirror.mirror(), Some(location));
            }
        }
        assert_eq!(Location::Head.mirror(), None);
        assert_eq!(Location::CenterTorso.mirror(), None);
    }

    #[test]
    fn test_dynamic_order_covers_every_location() {
        let mut seen = Location::DYNAMIC_SLOT_ORDER.to_vec();
        seen.sort();
        let mut all = Location::ALL.to_vec();
        all.sort();
        assert_eq!(seen, all);
    }

    #[test]
    fn test_torso_sides() {
        assert!(Location::LeftTorso.has_side(ArmorSide::Back));
        assert!(!Location::LeftTorso.has_side(ArmorSide::Only));
        assert!(Location::Head.has_side(ArmorSide::Only));
        assert!(!Location::RightArm.has_side(ArmorSide::Front));
    }
}
