//! Fit rules for items, armor and upgrades
//!
//! Every check is a pure function of the current state and returns an
//! [`EquipResult`] naming the first rule that failed.

use crate::catalog::{ArmorUpgrade, GuidanceUpgrade, Item, ItemKind, StructureUpgrade};
use crate::core::error::{EquipRejection, EquipResult};
use crate::core::types::{ArmorSide, HardpointType, Location, MASS_EPSILON};
use crate::loadout::aggregate::Loadout;
use crate::loadout::component::ComponentState;

fn fits_mass(extra: f64, free: f64) -> bool {
    extra <= free + MASS_EPSILON
}

/// Heat sinks already in `component` that `item` would carry once mounted
fn absorbed_heat_sinks(component: &ComponentState, item: &Item) -> u32 {
    if item.is_engine() && component.engine().is_none() {
        component.heat_sink_count().min(item.heat_sink_capacity())
    } else {
        0
    }
}

/// Whether `item` fits into `component`, ignoring loadout-wide limits
pub fn component_can_equip(component: &ComponentState, item: &Item) -> EquipResult {
    if item.is_internal() {
        return Err(EquipRejection::InternalItem);
    }

    if !item.allowed_in(component.location()) {
        return Err(EquipRejection::WrongLocation);
    }

    if item.is_heat_sink() && component.has_free_engine_heat_sink_slot() {
        return Ok(());
    }

    if component.slots_free() + absorbed_heat_sinks(component, item) < item.slots {
        return Err(EquipRejection::NotEnoughSlots);
    }

    if item.unique && component.contains(item) {
        return Err(EquipRejection::DuplicateItem);
    }

    if item.hardpoint != HardpointType::None
        && component.hardpoints_used(item.hardpoint) >= component.hardpoint_count(item.hardpoint)
    {
        return Err(EquipRejection::NotEnoughHardpoints);
    }

    Ok(())
}

/// Whether `item` fits on the loadout with respect to tonnage, totals and
/// upgrade selection. With a `location`, a heat sink is only free of slot
/// cost if it would ride an engine there.
pub fn loadout_can_equip(
    loadout: &Loadout,
    item: &Item,
    location: Option<Location>,
) -> EquipResult {
    if item.is_internal() {
        return Err(EquipRejection::InternalItem);
    }

    if item.is_heat_sink() && item.id != loadout.upgrades().heat_sinks.heat_sink {
        return Err(EquipRejection::IncompatibleUpgrade);
    }

    match &item.kind {
        ItemKind::Engine {
            rating, side_slots, ..
        } => {
            if loadout.engine().is_some() {
                return Err(EquipRejection::EngineAlreadyEquipped);
            }
            if !loadout.chassis().accepts_engine_rating(*rating) {
                return Err(EquipRejection::EngineRatingOutOfRange);
            }
            if *side_slots > 0 {
                let sides = [Location::LeftTorso, Location::RightTorso];
                if sides
                    .iter()
                    .any(|&side| loadout.component(side).slots_free() < *side_slots)
                {
                    return Err(EquipRejection::NotEnoughSlotsForXlSides);
                }
            }
        }
        ItemKind::JumpJet { min_tons, max_tons } => {
            if loadout.jump_jets() >= loadout.jump_jets_max() {
                return Err(EquipRejection::TooManyJumpJets);
            }
            let tons = loadout.chassis().max_tons;
            if tons < *min_tons || tons > *max_tons {
                return Err(EquipRejection::IncompatibleChassis);
            }
        }
        _ => {}
    }

    // An XL engine also brings one side item per side torso
    let side_mass = item
        .side_internal()
        .and_then(|id| loadout.catalog().item(id).ok())
        .map_or(0.0, |side| 2.0 * side.mass);
    if !fits_mass(loadout.mass_of(item) + side_mass, loadout.free_mass()) {
        return Err(EquipRejection::NotEnoughTonnage);
    }

    let rides_engine = match location {
        Some(location) => loadout.component(location).has_free_engine_heat_sink_slot(),
        None => loadout.has_free_engine_heat_sink_slot(),
    };
    let absorbed = match location {
        Some(location) => absorbed_heat_sinks(loadout.component(location), item),
        None => Location::ALL
            .iter()
            .map(|&location| absorbed_heat_sinks(loadout.component(location), item))
            .max()
            .unwrap_or(0),
    };
    let slot_cost = if item.is_heat_sink() && rides_engine {
        0
    } else {
        (item.slots + 2 * item.side_slots()).saturating_sub(absorbed)
    };
    let available = loadout
        .slots_free()
        .saturating_sub(loadout.upgrades().dynamic_slots());
    if slot_cost > available {
        return Err(EquipRejection::NotEnoughSlots);
    }

    Ok(())
}

/// Whether `location`'s `side` may be set to `amount` armor points
pub fn can_set_armor(
    loadout: &Loadout,
    location: Location,
    side: ArmorSide,
    amount: u32,
) -> EquipResult {
    if !location.has_side(side) {
        return Err(EquipRejection::WrongArmorSide);
    }

    let component = loadout.component(location);
    if amount > component.armor_max_for_side(side) {
        return Err(EquipRejection::ArmorOutOfRange);
    }

    let current = component.armor(side);
    if amount > current {
        let extra = f64::from(amount - current) / loadout.upgrades().armor.points_per_ton;
        if !fits_mass(extra, loadout.free_mass()) {
            return Err(EquipRejection::NotEnoughTonnage);
        }
    }

    Ok(())
}

/// Whether the bonus slots of a structure/armor pair fit in the free slots
fn bonus_slots_fit(loadout: &Loadout, structure_slots: u32, armor_slots: u32) -> EquipResult {
    if structure_slots + armor_slots > loadout.slots_free() {
        return Err(EquipRejection::NotEnoughSlots);
    }
    Ok(())
}

pub fn can_change_structure(loadout: &Loadout, upgrade: &StructureUpgrade) -> EquipResult {
    let current = &loadout.upgrades().structure;
    let extra = loadout.chassis().max_tons * (upgrade.mass_fraction - current.mass_fraction);
    if !fits_mass(extra, loadout.free_mass()) {
        return Err(EquipRejection::NotEnoughTonnage);
    }
    bonus_slots_fit(
        loadout,
        upgrade.dynamic_slots,
        loadout.upgrades().armor.dynamic_slots,
    )
}

pub fn can_change_armor(loadout: &Loadout, upgrade: &ArmorUpgrade) -> EquipResult {
    let new_mass = f64::from(loadout.armor_points()) / upgrade.points_per_ton;
    if !fits_mass(new_mass - loadout.armor_mass(), loadout.free_mass()) {
        return Err(EquipRejection::NotEnoughTonnage);
    }
    bonus_slots_fit(
        loadout,
        loadout.upgrades().structure.dynamic_slots,
        upgrade.dynamic_slots,
    )
}

pub fn can_change_guidance(loadout: &Loadout, upgrade: &GuidanceUpgrade) -> EquipResult {
    let launchers = f64::from(loadout.guided_launchers());
    let extra = launchers * (upgrade.extra_mass - loadout.upgrades().guidance.extra_mass);
    if !fits_mass(extra, loadout.free_mass()) {
        return Err(EquipRejection::NotEnoughTonnage);
    }
    Ok(())
}
