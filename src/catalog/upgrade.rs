//! Upgrade families and the per-loadout selection

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::types::{ItemId, UpgradeId};

/// Internal structure type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureUpgrade {
    pub id: UpgradeId,
    pub name: String,
    /// Bonus slots that must be reserved somewhere on the loadout
    #[serde(default)]
    pub dynamic_slots: u32,
    /// Structure mass as a fraction of chassis tonnage
    pub mass_fraction: f64,
}

/// Armor type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorUpgrade {
    pub id: UpgradeId,
    pub name: String,
    #[serde(default)]
    pub dynamic_slots: u32,
    pub points_per_ton: f64,
}

/// Heat sink type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSinkUpgrade {
    pub id: UpgradeId,
    pub name: String,
    /// The only heat sink item that may be equipped
    pub heat_sink: ItemId,
}

/// Missile guidance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceUpgrade {
    pub id: UpgradeId,
    pub name: String,
    /// Extra tons per missile-hardpoint item
    #[serde(default)]
    pub extra_mass: f64,
}

/// Which upgrade family an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeFamily {
    Structure,
    Armor,
    HeatSinks,
    Guidance,
}

/// The upgrade selection of one loadout
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrades {
    pub structure: Arc<StructureUpgrade>,
    pub armor: Arc<ArmorUpgrade>,
    pub heat_sinks: Arc<HeatSinkUpgrade>,
    pub guidance: Arc<GuidanceUpgrade>,
}

impl Upgrades {
    /// Bonus slots demanded by structure and armor together
    pub fn dynamic_slots(&self) -> u32 {
        self.structure.dynamic_slots + self.armor.dynamic_slots
    }

    /// Id of the selected upgrade in `family`
    pub fn selected(&self, family: UpgradeFamily) -> &UpgradeId {
        match family {
            UpgradeFamily::Structure => &self.structure.id,
            UpgradeFamily::Armor => &self.armor.id,
            UpgradeFamily::HeatSinks => &self.heat_sinks.id,
            UpgradeFamily::Guidance => &self.guidance.id,
        }
    }
}
