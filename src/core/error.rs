use thiserror::Error;

use crate::core::types::{ChassisId, ItemId, Location, UpgradeId};

/// Why an item, armor amount or upgrade does not fit.
///
/// These are expected outcomes of validation and are always recoverable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipRejection {
    #[error("Not enough free critical slots")]
    NotEnoughSlots,

    #[error("Not enough free slots in the side torsos for the engine")]
    NotEnoughSlotsForXlSides,

    #[error("No free hardpoint of the required type")]
    NotEnoughHardpoints,

    #[error("Not enough free tonnage")]
    NotEnoughTonnage,

    #[error("Only one of this item fits in a component")]
    DuplicateItem,

    #[error("Item cannot be mounted in this location")]
    WrongLocation,

    #[error("Engine rating is outside the chassis range")]
    EngineRatingOutOfRange,

    #[error("An engine is already equipped")]
    EngineAlreadyEquipped,

    #[error("Maximum number of jump jets reached")]
    TooManyJumpJets,

    #[error("Item is not compatible with this chassis")]
    IncompatibleChassis,

    #[error("Item does not match the selected upgrade")]
    IncompatibleUpgrade,

    #[error("Internal items cannot be equipped manually")]
    InternalItem,

    #[error("Armor amount exceeds the component maximum")]
    ArmorOutOfRange,

    #[error("Armor side does not exist on this component")]
    WrongArmorSide,
}

/// Outcome of a fit check
pub type EquipResult = std::result::Result<(), EquipRejection>;

#[derive(Error, Debug)]
pub enum LoadoutError {
    #[error("Edit rejected: {0}")]
    Rejected(#[from] EquipRejection),

    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("Unknown chassis: {0}")]
    UnknownChassis(ChassisId),

    #[error("Unknown upgrade: {0}")]
    UnknownUpgrade(UpgradeId),

    #[error("Item {item} is not equipped in {location}")]
    ItemNotFound { item: ItemId, location: Location },

    #[error("{0} has no mirrored location")]
    NoMirror(Location),

    #[error("Invalid operation state: {0}")]
    InvalidState(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LoadoutError>;
