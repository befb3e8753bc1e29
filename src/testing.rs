//! Shared fixtures for unit tests

use std::sync::Arc;

use crate::catalog::{Catalog, Item};
use crate::core::config::EditorConfig;
use crate::core::types::{ChassisId, ItemId};
use crate::loadout::Loadout;

const CATALOG: &str = include_str!("../tests/data/catalog.toml");

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_toml_str(CATALOG).expect("test catalog parses"))
}

/// Empty loadout on the 50 ton test chassis with default upgrades
pub fn loadout() -> Loadout {
    Loadout::new(catalog(), &ChassisId::from("test-50"), &EditorConfig::default())
        .expect("test loadout builds")
}

pub fn item(loadout: &Loadout, id: &str) -> Arc<Item> {
    loadout
        .catalog()
        .item(&ItemId::from(id))
        .expect("test item exists")
}
