//! Per-location equipment and armor state
//!
//! A [`ComponentState`] only answers questions and applies unchecked
//! mutations. Whether a mutation is allowed is decided by the rules module
//! and enforced by operations, so the state itself never sits half-valid.

use std::sync::Arc;

use crate::catalog::{ChassisComponent, Item};
use crate::core::error::{EquipResult, LoadoutError, Result};
use crate::core::types::{ArmorSide, HardpointType, Location};
use crate::loadout::rules;

/// Equipment and armor of one body location
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentState {
    definition: ChassisComponent,
    items: Vec<Arc<Item>>,
    armor_front: u32,
    armor_back: u32,
    manual_armor: bool,
}

impl ComponentState {
    /// Fresh component with its fixed internals installed and no armor
    pub fn new(definition: ChassisComponent, fixed_items: Vec<Arc<Item>>) -> Self {
        Self {
            definition,
            items: fixed_items,
            armor_front: 0,
            armor_back: 0,
            manual_armor: false,
        }
    }

    pub fn location(&self) -> Location {
        self.definition.location
    }

    pub fn definition(&self) -> &ChassisComponent {
        &self.definition
    }

    /// Items in mount order, fixed internals first
    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    /// Items that can be removed by the user
    pub fn removable_items(&self) -> impl Iterator<Item = &Arc<Item>> {
        self.items.iter().filter(|item| !item.is_internal())
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.iter().any(|i| **i == *item)
    }

    pub fn count_of(&self, item: &Item) -> usize {
        self.items.iter().filter(|i| ***i == *item).count()
    }

    // === SLOTS ===

    pub fn slots_total(&self) -> u32 {
        self.definition.slots
    }

    /// Slots consumed, with heat sinks riding the engine counted as free
    pub fn slots_used(&self) -> u32 {
        let mut engine_capacity = self.engine_heat_sink_capacity();
        self.items
            .iter()
            .map(|item| {
                if item.is_heat_sink() && engine_capacity > 0 {
                    engine_capacity -= 1;
                    0
                } else {
                    item.slots
                }
            })
            .sum()
    }

    pub fn slots_free(&self) -> u32 {
        self.slots_total().saturating_sub(self.slots_used())
    }

    // === ENGINE ===

    /// The engine mounted here, if any
    pub fn engine(&self) -> Option<&Arc<Item>> {
        self.items.iter().find(|item| item.is_engine())
    }

    /// Heat sinks the mounted engine can hold without slot cost
    pub fn engine_heat_sink_capacity(&self) -> u32 {
        self.engine().map_or(0, |engine| engine.heat_sink_capacity())
    }

    /// Heat sinks currently riding the engine's heat sink slots
    pub fn engine_heat_sinks(&self) -> u32 {
        self.heat_sink_count().min(self.engine_heat_sink_capacity())
    }

    /// Whether another heat sink would ride the engine for free
    pub fn has_free_engine_heat_sink_slot(&self) -> bool {
        self.engine_heat_sinks() < self.engine_heat_sink_capacity()
    }

    pub fn heat_sink_count(&self) -> u32 {
        self.items.iter().filter(|item| item.is_heat_sink()).count() as u32
    }

    // === HARDPOINTS ===

    /// Mounts of `kind` the chassis declares here
    pub fn hardpoint_count(&self, kind: HardpointType) -> u32 {
        self.definition.hardpoint_count(kind)
    }

    /// Equipped items occupying a mount of `kind`
    pub fn hardpoints_used(&self, kind: HardpointType) -> u32 {
        self.items.iter().filter(|item| item.hardpoint == kind).count() as u32
    }

    // === ARMOR ===

    pub fn armor(&self, side: ArmorSide) -> u32 {
        match side {
            ArmorSide::Back => self.armor_back,
            ArmorSide::Front | ArmorSide::Only => self.armor_front,
        }
    }

    pub fn armor_total(&self) -> u32 {
        self.armor_front + self.armor_back
    }

    pub fn armor_max(&self) -> u32 {
        self.definition.armor_max
    }

    /// Largest amount `side` may hold given the other side's current armor
    pub fn armor_max_for_side(&self, side: ArmorSide) -> u32 {
        match side {
            ArmorSide::Front => self.armor_max().saturating_sub(self.armor_back),
            ArmorSide::Back => self.armor_max().saturating_sub(self.armor_front),
            ArmorSide::Only => self.armor_max(),
        }
    }

    /// Whether armor here was set by hand rather than distributed
    pub fn has_manual_armor(&self) -> bool {
        self.manual_armor
    }

    /// Mass of equipped items
    pub fn items_mass(&self) -> f64 {
        self.items.iter().map(|item| item.mass).sum()
    }

    /// Component-level fit check for `item`
    pub fn can_equip(&self, item: &Item) -> EquipResult {
        rules::component_can_equip(self, item)
    }

    // === MUTATORS (unchecked) ===

    pub(crate) fn add_item(&mut self, item: Arc<Item>) {
        self.items.push(item);
    }

    pub(crate) fn insert_item(&mut self, index: usize, item: Arc<Item>) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Removes the last equal occurrence of `item` and returns its index
    pub(crate) fn remove_item(&mut self, item: &Item) -> Result<usize> {
        let index = self
            .items
            .iter()
            .rposition(|i| **i == *item)
            .ok_or_else(|| LoadoutError::ItemNotFound {
                item: item.id.clone(),
                location: self.location(),
            })?;
        self.items.remove(index);
        Ok(index)
    }

    pub(crate) fn set_armor(&mut self, side: ArmorSide, amount: u32, manual: bool) {
        match side {
            ArmorSide::Back => self.armor_back = amount,
            ArmorSide::Front | ArmorSide::Only => self.armor_front = amount,
        }
        self.manual_armor = manual;
    }
}
