//! Chassis definitions
//!
//! A chassis is the template a loadout is built on: tonnage, engine limits,
//! and the static layout of each body location.

use serde::{Deserialize, Serialize};

use crate::core::types::{ChassisId, HardpointType, ItemId, Location};

/// Number of mounts of one type in a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardpoint {
    #[serde(rename = "type")]
    pub kind: HardpointType,
    pub count: u32,
}

/// Static definition of one body location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChassisComponent {
    pub location: Location,
    /// Total critical slots
    pub slots: u32,
    /// Maximum armor points (front and back combined on torsos)
    pub armor_max: u32,
    #[serde(default)]
    pub hardpoints: Vec<Hardpoint>,
    /// Internal items installed when a loadout is created
    #[serde(default)]
    pub fixed_items: Vec<ItemId>,
}

impl ChassisComponent {
    pub fn new(location: Location, slots: u32, armor_max: u32) -> Self {
        Self {
            location,
            slots,
            armor_max,
            hardpoints: Vec::new(),
            fixed_items: Vec::new(),
        }
    }

    pub fn with_hardpoints(mut self, kind: HardpointType, count: u32) -> Self {
        self.hardpoints.push(Hardpoint { kind, count });
        self
    }

    pub fn with_fixed(mut self, item: &str) -> Self {
        self.fixed_items.push(ItemId::from(item));
        self
    }

    /// Mounts of `kind` declared here
    pub fn hardpoint_count(&self, kind: HardpointType) -> u32 {
        self.hardpoints
            .iter()
            .filter(|hp| hp.kind == kind)
            .map(|hp| hp.count)
            .sum()
    }
}

/// A vehicle template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chassis {
    pub id: ChassisId,
    pub name: String,
    /// Maximum tonnage
    pub max_tons: f64,
    pub engine_min: u32,
    pub engine_max: u32,
    #[serde(default)]
    pub max_jump_jets: u32,
    pub components: Vec<ChassisComponent>,
}

impl Chassis {
    /// Definition of `location`, if present
    pub fn component(&self, location: Location) -> Option<&ChassisComponent> {
        self.components.iter().find(|c| c.location == location)
    }

    /// Whether an engine of `rating` may be installed
    pub fn accepts_engine_rating(&self, rating: u32) -> bool {
        (self.engine_min..=self.engine_max).contains(&rating)
    }

    /// Every location defined exactly once
    pub fn validate(&self) -> Result<(), String> {
        for location in Location::ALL {
            let count = self
                .components
                .iter()
                .filter(|c| c.location == location)
                .count();
            if count != 1 {
                return Err(format!(
                    "{}: expected one definition of {}, found {}",
                    self.id, location, count
                ));
            }
        }
        if self.engine_min > self.engine_max {
            return Err(format!(
                "{}: engine_min ({}) above engine_max ({})",
                self.id, self.engine_min, self.engine_max
            ));
        }
        if self.max_tons <= 0.0 {
            return Err(format!("{}: max_tons must be positive", self.id));
        }
        Ok(())
    }
}
