//! The loadout aggregate
//!
//! Owns one [`ComponentState`] per location plus the chassis and upgrade
//! selection. Totals are recomputed from component state on every query.

use std::sync::Arc;

use crate::catalog::{Catalog, Chassis, Item, Upgrades};
use crate::core::config::EditorConfig;
use crate::core::error::{EquipResult, LoadoutError, Result};
use crate::core::types::{ArmorSide, ChassisId, HardpointType, Location, LoadoutId, MASS_EPSILON};
use crate::loadout::component::ComponentState;
use crate::loadout::rules;

/// A configurable equipment build on a chassis
#[derive(Debug, Clone)]
pub struct Loadout {
    id: LoadoutId,
    name: String,
    catalog: Arc<Catalog>,
    chassis: Arc<Chassis>,
    /// Indexed by [`Location::index`]
    components: Vec<ComponentState>,
    upgrades: Upgrades,
}

impl Loadout {
    /// Empty loadout on `chassis_id` with the configured default upgrades
    pub fn new(
        catalog: Arc<Catalog>,
        chassis_id: &ChassisId,
        config: &EditorConfig,
    ) -> Result<Self> {
        let upgrades = Upgrades {
            structure: catalog.structure(&config.default_structure)?,
            armor: catalog.armor(&config.default_armor)?,
            heat_sinks: catalog.heat_sinks(&config.default_heat_sinks)?,
            guidance: catalog.guidance(&config.default_guidance)?,
        };
        Self::with_upgrades(catalog, chassis_id, upgrades)
    }

    /// Empty loadout on `chassis_id` with an explicit upgrade selection
    pub fn with_upgrades(
        catalog: Arc<Catalog>,
        chassis_id: &ChassisId,
        upgrades: Upgrades,
    ) -> Result<Self> {
        let chassis = catalog.chassis(chassis_id)?;

        let mut components = Vec::with_capacity(Location::ALL.len());
        for location in Location::ALL {
            let definition = chassis.component(location).cloned().ok_or_else(|| {
                LoadoutError::InvalidCatalog(format!(
                    "{} has no {} definition",
                    chassis.id, location
                ))
            })?;
            let fixed = definition
                .fixed_items
                .iter()
                .map(|id| catalog.item(id))
                .collect::<Result<Vec<_>>>()?;
            components.push(ComponentState::new(definition, fixed));
        }

        tracing::debug!("Created loadout on {}", chassis.name);

        Ok(Self {
            id: LoadoutId::new(),
            name: chassis.name.clone(),
            catalog,
            chassis,
            components,
            upgrades,
        })
    }

    pub fn id(&self) -> LoadoutId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn chassis(&self) -> &Chassis {
        &self.chassis
    }

    pub fn upgrades(&self) -> &Upgrades {
        &self.upgrades
    }

    pub fn component(&self, location: Location) -> &ComponentState {
        &self.components[location.index()]
    }

    /// Components in [`Location::ALL`] order
    pub fn components(&self) -> impl Iterator<Item = &ComponentState> {
        self.components.iter()
    }

    pub(crate) fn component_mut(&mut self, location: Location) -> &mut ComponentState {
        &mut self.components[location.index()]
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn upgrades_mut(&mut self) -> &mut Upgrades {
        &mut self.upgrades
    }

    // === MASS ===

    /// Internal structure mass
    pub fn structure_mass(&self) -> f64 {
        self.chassis.max_tons * self.upgrades.structure.mass_fraction
    }

    pub fn armor_points(&self) -> u32 {
        self.components.iter().map(|c| c.armor_total()).sum()
    }

    pub fn armor_mass(&self) -> f64 {
        f64::from(self.armor_points()) / self.upgrades.armor.points_per_ton
    }

    pub fn items_mass(&self) -> f64 {
        self.components.iter().map(|c| c.items_mass()).sum()
    }

    /// Items that receive guidance mass
    pub fn guided_launchers(&self) -> u32 {
        self.components
            .iter()
            .map(|c| c.hardpoints_used(HardpointType::Missile))
            .sum()
    }

    pub fn guidance_mass(&self) -> f64 {
        f64::from(self.guided_launchers()) * self.upgrades.guidance.extra_mass
    }

    /// Mass `item` would add, including guidance
    pub fn mass_of(&self, item: &Item) -> f64 {
        if item.hardpoint == HardpointType::Missile {
            item.mass + self.upgrades.guidance.extra_mass
        } else {
            item.mass
        }
    }

    pub fn mass(&self) -> f64 {
        self.structure_mass() + self.armor_mass() + self.items_mass() + self.guidance_mass()
    }

    pub fn free_mass(&self) -> f64 {
        self.chassis.max_tons - self.mass()
    }

    // === SLOTS ===

    pub fn slots_total(&self) -> u32 {
        self.components.iter().map(|c| c.slots_total()).sum()
    }

    pub fn slots_used(&self) -> u32 {
        self.components.iter().map(|c| c.slots_used()).sum()
    }

    /// Free slots across all components, before dynamic slot reservation
    pub fn slots_free(&self) -> u32 {
        self.components.iter().map(|c| c.slots_free()).sum()
    }

    // === EQUIPMENT ===

    /// The equipped engine, if any
    pub fn engine(&self) -> Option<&Arc<Item>> {
        self.components.iter().find_map(|c| c.engine())
    }

    /// Location holding the engine
    pub fn engine_location(&self) -> Option<Location> {
        self.components
            .iter()
            .find(|c| c.engine().is_some())
            .map(|c| c.location())
    }

    pub fn has_free_engine_heat_sink_slot(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.has_free_engine_heat_sink_slot())
    }

    pub fn heat_sinks(&self) -> u32 {
        self.components.iter().map(|c| c.heat_sink_count()).sum()
    }

    pub fn jump_jets(&self) -> u32 {
        self.components
            .iter()
            .flat_map(|c| c.items())
            .filter(|item| item.is_jump_jet())
            .count() as u32
    }

    pub fn jump_jets_max(&self) -> u32 {
        self.chassis.max_jump_jets
    }

    /// Every equipped item with its location, in location order
    pub fn all_items(&self) -> impl Iterator<Item = (Location, &Arc<Item>)> {
        self.components
            .iter()
            .flat_map(|c| c.items().iter().map(move |item| (c.location(), item)))
    }

    // === VALIDATION ===

    /// Loadout-wide fit check, independent of destination component
    pub fn can_equip(&self, item: &Item) -> EquipResult {
        rules::loadout_can_equip(self, item, None)
    }

    /// Loadout-wide and component-level fit check for `location`
    pub fn can_equip_at(&self, location: Location, item: &Item) -> EquipResult {
        rules::loadout_can_equip(self, item, Some(location))?;
        self.component(location).can_equip(item)
    }

    pub fn can_set_armor(&self, location: Location, side: ArmorSide, amount: u32) -> EquipResult {
        rules::can_set_armor(self, location, side, amount)
    }

    /// Report every broken invariant
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for component in &self.components {
            let location = component.location();
            if component.slots_used() > component.slots_total() {
                errors.push(format!(
                    "{}: {} slots used of {}",
                    location,
                    component.slots_used(),
                    component.slots_total()
                ));
            }
            if component.armor_total() > component.armor_max() {
                errors.push(format!(
                    "{}: {} armor exceeds maximum {}",
                    location,
                    component.armor_total(),
                    component.armor_max()
                ));
            }
            let mut kinds: Vec<HardpointType> = Vec::new();
            for item in component.items() {
                if item.hardpoint != HardpointType::None && !kinds.contains(&item.hardpoint) {
                    kinds.push(item.hardpoint);
                }
            }
            for kind in kinds {
                let used = component.hardpoints_used(kind);
                if used > component.hardpoint_count(kind) {
                    errors.push(format!(
                        "{}: {} {:?} items on {} hardpoints",
                        location,
                        used,
                        kind,
                        component.hardpoint_count(kind)
                    ));
                }
            }
        }

        if self.slots_free() < self.upgrades.dynamic_slots() {
            errors.push(format!(
                "{} free slots cannot hold {} upgrade slots",
                self.slots_free(),
                self.upgrades.dynamic_slots()
            ));
        }

        if self.free_mass() < -MASS_EPSILON {
            errors.push(format!(
                "mass {:.2} exceeds {:.2} tons",
                self.mass(),
                self.chassis.max_tons
            ));
        }

        if let Some(side_id) = self.engine().and_then(|engine| engine.side_internal()) {
            for side in [Location::LeftTorso, Location::RightTorso] {
                let mirrors = self
                    .component(side)
                    .items()
                    .iter()
                    .filter(|item| item.id == *side_id)
                    .count();
                if mirrors != 1 {
                    errors.push(format!(
                        "{}: expected one engine side item, found {}",
                        side, mirrors
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl PartialEq for Loadout {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.chassis == other.chassis
            && self.components == other.components
            && self.upgrades == other.upgrades
    }
}
