pub mod config;
pub mod error;
pub mod types;

pub use config::EditorConfig;
pub use error::{EquipRejection, EquipResult, LoadoutError, Result};
pub use types::{ArmorSide, ChassisId, HardpointType, ItemId, Location, LoadoutId, UpgradeId};
