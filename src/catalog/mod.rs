//! Read-only equipment catalog
//!
//! The [`Catalog`] owns every item, chassis and upgrade a loadout can refer
//! to. It is built once (programmatically or from a TOML document) and then
//! shared as `Arc<Catalog>`. A failed lookup is a data error, not a
//! validation outcome.

pub mod chassis;
pub mod item;
pub mod upgrade;

pub use chassis::{Chassis, ChassisComponent, Hardpoint};
pub use item::{Item, ItemCategory, ItemKind};
pub use upgrade::{
    ArmorUpgrade, GuidanceUpgrade, HeatSinkUpgrade, StructureUpgrade, UpgradeFamily, Upgrades,
};

use ahash::AHashMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::{LoadoutError, Result};
use crate::core::types::{ChassisId, ItemId, UpgradeId};

/// On-disk layout of a catalog document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    items: Vec<Item>,
    chassis: Vec<Chassis>,
    structure: Vec<StructureUpgrade>,
    armor: Vec<ArmorUpgrade>,
    heat_sinks: Vec<HeatSinkUpgrade>,
    guidance: Vec<GuidanceUpgrade>,
}

/// Immutable lookup tables for items, chassis and upgrades
#[derive(Debug, Default)]
pub struct Catalog {
    items: AHashMap<ItemId, Arc<Item>>,
    chassis: AHashMap<ChassisId, Arc<Chassis>>,
    structure: AHashMap<UpgradeId, Arc<StructureUpgrade>>,
    armor: AHashMap<UpgradeId, Arc<ArmorUpgrade>>,
    heat_sinks: AHashMap<UpgradeId, Arc<HeatSinkUpgrade>>,
    guidance: AHashMap<UpgradeId, Arc<GuidanceUpgrade>>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML catalog document and check it for consistency
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;

        let mut catalog = Self::new();
        for item in file.items {
            catalog.register_item(item);
        }
        for chassis in file.chassis {
            catalog.register_chassis(chassis);
        }
        for upgrade in file.structure {
            catalog.register_structure(upgrade);
        }
        for upgrade in file.armor {
            catalog.register_armor(upgrade);
        }
        for upgrade in file.heat_sinks {
            catalog.register_heat_sinks(upgrade);
        }
        for upgrade in file.guidance {
            catalog.register_guidance(upgrade);
        }

        catalog.validate()?;
        tracing::debug!(
            "Loaded catalog with {} items and {} chassis",
            catalog.items.len(),
            catalog.chassis.len()
        );
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn register_item(&mut self, item: Item) -> Arc<Item> {
        let item = Arc::new(item);
        self.items.insert(item.id.clone(), Arc::clone(&item));
        item
    }

    pub fn register_chassis(&mut self, chassis: Chassis) -> Arc<Chassis> {
        let chassis = Arc::new(chassis);
        self.chassis.insert(chassis.id.clone(), Arc::clone(&chassis));
        chassis
    }

    pub fn register_structure(&mut self, upgrade: StructureUpgrade) {
        self.structure.insert(upgrade.id.clone(), Arc::new(upgrade));
    }

    pub fn register_armor(&mut self, upgrade: ArmorUpgrade) {
        self.armor.insert(upgrade.id.clone(), Arc::new(upgrade));
    }

    pub fn register_heat_sinks(&mut self, upgrade: HeatSinkUpgrade) {
        self.heat_sinks.insert(upgrade.id.clone(), Arc::new(upgrade));
    }

    pub fn register_guidance(&mut self, upgrade: GuidanceUpgrade) {
        self.guidance.insert(upgrade.id.clone(), Arc::new(upgrade));
    }

    pub fn item(&self, id: &ItemId) -> Result<Arc<Item>> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| LoadoutError::UnknownItem(id.clone()))
    }

    pub fn chassis(&self, id: &ChassisId) -> Result<Arc<Chassis>> {
        self.chassis
            .get(id)
            .cloned()
            .ok_or_else(|| LoadoutError::UnknownChassis(id.clone()))
    }

    pub fn structure(&self, id: &UpgradeId) -> Result<Arc<StructureUpgrade>> {
        self.structure
            .get(id)
            .cloned()
            .ok_or_else(|| LoadoutError::UnknownUpgrade(id.clone()))
    }

    pub fn armor(&self, id: &UpgradeId) -> Result<Arc<ArmorUpgrade>> {
        self.armor
            .get(id)
            .cloned()
            .ok_or_else(|| LoadoutError::UnknownUpgrade(id.clone()))
    }

    pub fn heat_sinks(&self, id: &UpgradeId) -> Result<Arc<HeatSinkUpgrade>> {
        self.heat_sinks
            .get(id)
            .cloned()
            .ok_or_else(|| LoadoutError::UnknownUpgrade(id.clone()))
    }

    pub fn guidance(&self, id: &UpgradeId) -> Result<Arc<GuidanceUpgrade>> {
        self.guidance
            .get(id)
            .cloned()
            .ok_or_else(|| LoadoutError::UnknownUpgrade(id.clone()))
    }

    /// All items of a category, sorted by id
    pub fn items_by_category(&self, category: ItemCategory) -> Vec<Arc<Item>> {
        let mut items: Vec<Arc<Item>> = self
            .items
            .values()
            .filter(|item| item.category() == category)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    /// Check cross references between catalog entries
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for item in self.items.values() {
            if let Some(side_id) = item.side_internal() {
                match self.items.get(side_id) {
                    Some(side) if side.is_internal() && side.slots == item.side_slots() => {}
                    Some(_) => errors.push(format!(
                        "{}: side item {} must be internal with {} slots",
                        item.id,
                        side_id,
                        item.side_slots()
                    )),
                    None => errors.push(format!("{}: unknown side item {}", item.id, side_id)),
                }
            }
        }

        for chassis in self.chassis.values() {
            if let Err(e) = chassis.validate() {
                errors.push(e);
            }
            for component in &chassis.components {
                for fixed in &component.fixed_items {
                    match self.items.get(fixed) {
                        Some(item) if item.is_internal() => {}
                        Some(_) => errors.push(format!(
                            "{}: fixed item {} in {} is not internal",
                            chassis.id, fixed, component.location
                        )),
                        None => errors.push(format!(
                            "{}: unknown fixed item {} in {}",
                            chassis.id, fixed, component.location
                        )),
                    }
                }
            }
        }

        for upgrade in self.heat_sinks.values() {
            match self.items.get(&upgrade.heat_sink) {
                Some(item) if item.is_heat_sink() => {}
                _ => errors.push(format!(
                    "{}: {} is not a heat sink item",
                    upgrade.id, upgrade.heat_sink
                )),
            }
        }

        for upgrade in self.armor.values() {
            if upgrade.points_per_ton <= 0.0 {
                errors.push(format!("{}: points_per_ton must be positive", upgrade.id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            errors.sort();
            Err(LoadoutError::InvalidCatalog(errors.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Location;

    fn side_item() -> Item {
        Item::new("xl-side", "XL Engine Side", 0.0, 3, ItemKind::Internal)
    }

    fn xl_engine(side_slots: u32) -> Item {
        Item::new(
            "xl-300",
            "XL 300",
            9.5,
            6,
            ItemKind::Engine {
                rating: 300,
                side_slots,
                side_internal: Some(ItemId::from("xl-side")),
            },
        )
    }

    #[test]
    fn test_lookup_missing_item_is_error() {
        let catalog = Catalog::new();
        let err = catalog.item(&ItemId::from("nope")).unwrap_err();
        assert!(matches!(err, LoadoutError::UnknownItem(_)));
    }

    #[test]
    fn test_validate_accepts_consistent_engine() {
        let mut catalog = Catalog::new();
        catalog.register_item(side_item());
        catalog.register_item(xl_engine(3));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_side_slot_mismatch() {
        let mut catalog = Catalog::new();
        catalog.register_item(side_item());
        catalog.register_item(xl_engine(2));
        assert!(matches!(
            catalog.validate(),
            Err(LoadoutError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_fixed_item() {
        let mut catalog = Catalog::new();
        let components = Location::ALL
            .iter()
            .map(|&loc| ChassisComponent::new(loc, 6, 20).with_fixed("ghost"))
            .collect();
        catalog.register_chassis(Chassis {
            id: ChassisId::from("c"),
            name: "C".into(),
            max_tons: 20.0,
            engine_min: 100,
            engine_max: 200,
            max_jump_jets: 0,
            components,
        });
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_items_by_category_sorted() {
        let mut catalog = Catalog::new();
        catalog.register_item(Item::new("b-laser", "B", 1.0, 1, ItemKind::Weapon));
        catalog.register_item(Item::new("a-laser", "A", 1.0, 1, ItemKind::Weapon));
        catalog.register_item(side_item());
        let weapons = catalog.items_by_category(ItemCategory::Weapon);
        let ids: Vec<_> = weapons.iter().map(|i| i.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a-laser", "b-laser"]);
    }

    #[test]
    fn test_from_toml_str() {
        let content = r#"
            [[items]]
            id = "heat-sink"
            name = "Heat Sink"
            mass = 1.0
            slots = 1
            kind = { type = "HeatSink", dissipation = 0.1 }

            [[items]]
            id = "medium-laser"
            name = "Medium Laser"
            mass = 1.0
            slots = 1
            hardpoint = "Energy"
            kind = { type = "Weapon" }

            [[heat_sinks]]
            id = "single-heat-sinks"
            name = "Single Heat Sinks"
            heat_sink = "heat-sink"
        "#;
        let catalog = Catalog::from_toml_str(content).unwrap();
        let laser = catalog.item(&ItemId::from("medium-laser")).unwrap();
        assert_eq!(laser.category(), ItemCategory::Weapon);
        assert!(catalog
            .heat_sinks(&UpgradeId::from("single-heat-sinks"))
            .is_ok());
    }
}
