//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use loadout_core::catalog::{Catalog, Item};
use loadout_core::core::types::{ChassisId, ItemId};
use loadout_core::{EditorConfig, Loadout};

/// Route `tracing` output through the test harness; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn catalog() -> Arc<Catalog> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/catalog.toml");
    Arc::new(Catalog::load_file(&path).expect("test catalog loads"))
}

pub fn loadout() -> Loadout {
    init_tracing();
    Loadout::new(catalog(), &ChassisId::from("test-50"), &EditorConfig::default())
        .expect("test loadout builds")
}

pub fn item(loadout: &Loadout, id: &str) -> Arc<Item> {
    loadout
        .catalog()
        .item(&ItemId::from(id))
        .expect("test item exists")
}
