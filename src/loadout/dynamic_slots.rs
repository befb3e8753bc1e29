//! Placement of upgrade bonus slots
//!
//! Structure and armor upgrades may demand bonus ("dynamic") slots. They are
//! not items: the distributor decides, from the current free slots, where
//! they are shown. Nothing here is stored; every query walks the loadout.

use crate::core::types::Location;
use crate::loadout::aggregate::Loadout;

/// Bonus slots reserved in one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamicSlots {
    pub structure: u32,
    pub armor: u32,
}

impl DynamicSlots {
    pub fn total(&self) -> u32 {
        self.structure + self.armor
    }
}

/// Read-only view computing dynamic slot allotments for a loadout
pub struct DynamicSlotDistributor<'a> {
    loadout: &'a Loadout,
}

impl<'a> DynamicSlotDistributor<'a> {
    pub fn new(loadout: &'a Loadout) -> Self {
        Self { loadout }
    }

    /// Free slots of every component visited before `location`
    fn cumulative_free_slots(&self, location: Location) -> u32 {
        Location::DYNAMIC_SLOT_ORDER
            .iter()
            .take_while(|&&visited| visited != location)
            .map(|&visited| self.loadout.component(visited).slots_free())
            .sum()
    }

    /// Structure bonus slots shown in `location`
    pub fn structure_slots(&self, location: Location) -> u32 {
        let to_fill = self.loadout.upgrades().structure.dynamic_slots;
        let filled = self.cumulative_free_slots(location);
        let free = self.loadout.component(location).slots_free();
        free.min(to_fill.saturating_sub(filled))
    }

    /// Armor bonus slots shown in `location`, placed after structure's
    pub fn armor_slots(&self, location: Location) -> u32 {
        let to_fill = self.loadout.upgrades().dynamic_slots();
        let filled = self.cumulative_free_slots(location);
        let free = self.loadout.component(location).slots_free();
        let reserved = free.min(to_fill.saturating_sub(filled));
        reserved.saturating_sub(self.structure_slots(location))
    }

    pub fn allotment(&self, location: Location) -> DynamicSlots {
        DynamicSlots {
            structure: self.structure_slots(location),
            armor: self.armor_slots(location),
        }
    }
}
