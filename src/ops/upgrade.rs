//! Upgrade selection edits

use std::any::Any;
use std::sync::Arc;

use crate::catalog::{
    ArmorUpgrade, Catalog, GuidanceUpgrade, HeatSinkUpgrade, Item, StructureUpgrade,
    UpgradeFamily, Upgrades,
};
use crate::core::error::{LoadoutError, Result};
use crate::core::types::{Location, UpgradeId};
use crate::loadout::{rules, Loadout};
use crate::messages::ChangeKind;
use crate::ops::{EditContext, OpState, Operation};

/// A new selection for one upgrade family
#[derive(Debug, Clone)]
pub enum UpgradeChange {
    Structure(Arc<StructureUpgrade>),
    Armor(Arc<ArmorUpgrade>),
    HeatSinks(Arc<HeatSinkUpgrade>),
    Guidance(Arc<GuidanceUpgrade>),
}

impl UpgradeChange {
    pub fn family(&self) -> UpgradeFamily {
        match self {
            UpgradeChange::Structure(_) => UpgradeFamily::Structure,
            UpgradeChange::Armor(_) => UpgradeFamily::Armor,
            UpgradeChange::HeatSinks(_) => UpgradeFamily::HeatSinks,
            UpgradeChange::Guidance(_) => UpgradeFamily::Guidance,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UpgradeChange::Structure(u) => &u.name,
            UpgradeChange::Armor(u) => &u.name,
            UpgradeChange::HeatSinks(u) => &u.name,
            UpgradeChange::Guidance(u) => &u.name,
        }
    }

    fn check(&self, loadout: &Loadout) -> Result<()> {
        let verdict = match self {
            UpgradeChange::Structure(u) => rules::can_change_structure(loadout, u),
            UpgradeChange::Armor(u) => rules::can_change_armor(loadout, u),
            UpgradeChange::Guidance(u) => rules::can_change_guidance(loadout, u),
            // Swapping heat sink type only ever frees mass and slots
            UpgradeChange::HeatSinks(_) => Ok(()),
        };
        Ok(verdict?)
    }

    fn install(&self, upgrades: &mut Upgrades) {
        match self {
            UpgradeChange::Structure(u) => upgrades.structure = Arc::clone(u),
            UpgradeChange::Armor(u) => upgrades.armor = Arc::clone(u),
            UpgradeChange::HeatSinks(u) => upgrades.heat_sinks = Arc::clone(u),
            UpgradeChange::Guidance(u) => upgrades.guidance = Arc::clone(u),
        }
    }
}

/// Select a different upgrade in one family
#[derive(Debug)]
pub struct SetUpgrade {
    change: UpgradeChange,
    previous: Option<Upgrades>,
    /// Heat sinks dropped by a heat sink type change, in removal order
    removed: Vec<(Location, usize, Arc<Item>)>,
    state: OpState,
}

impl SetUpgrade {
    pub fn new(change: UpgradeChange) -> Self {
        Self {
            change,
            previous: None,
            removed: Vec::new(),
            state: OpState::Created,
        }
    }

    /// Look `id` up in the catalog table of `family`
    pub fn by_id(catalog: &Catalog, family: UpgradeFamily, id: &UpgradeId) -> Result<Self> {
        let change = match family {
            UpgradeFamily::Structure => UpgradeChange::Structure(catalog.structure(id)?),
            UpgradeFamily::Armor => UpgradeChange::Armor(catalog.armor(id)?),
            UpgradeFamily::HeatSinks => UpgradeChange::HeatSinks(catalog.heat_sinks(id)?),
            UpgradeFamily::Guidance => UpgradeChange::Guidance(catalog.guidance(id)?),
        };
        Ok(Self::new(change))
    }

    pub fn change(&self) -> &UpgradeChange {
        &self.change
    }

    /// Heat sinks dropped by the last apply
    pub fn removed_heat_sinks(&self) -> usize {
        self.removed.len()
    }
}

impl Operation for SetUpgrade {
    fn describe(&self) -> String {
        format!("Change upgrade to {}", self.change.name())
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("SetUpgrade")?;

        if let Err(err) = self.change.check(ctx.loadout) {
            tracing::warn!("{} rejected: {}", self.describe(), err);
            return Err(err);
        }
        self.previous = Some(ctx.loadout.upgrades().clone());

        let mut removed = Vec::new();
        if let UpgradeChange::HeatSinks(_) = self.change {
            for location in Location::ALL {
                let component = ctx.loadout.component_mut(location);
                let heat_sinks: Vec<Arc<Item>> = component
                    .items()
                    .iter()
                    .filter(|item| item.is_heat_sink())
                    .cloned()
                    .collect();
                for heat_sink in heat_sinks.into_iter().rev() {
                    let index = component.remove_item(&heat_sink)?;
                    removed.push((location, index, heat_sink));
                }
                if removed.last().is_some_and(|(loc, _, _)| *loc == location) {
                    ctx.post(Some(location), ChangeKind::ItemRemoved);
                }
            }
        }

        self.change.install(ctx.loadout.upgrades_mut());
        tracing::debug!(
            "{:?} upgrade set to {} ({} heat sinks dropped)",
            self.change.family(),
            self.change.name(),
            removed.len()
        );
        ctx.post(None, ChangeKind::UpgradeChanged);
        ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);

        self.removed = removed;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("SetUpgrade")?;
        let previous = self.previous.take().ok_or_else(|| {
            LoadoutError::InvalidState("SetUpgrade has no recorded upgrades".into())
        })?;

        *ctx.loadout.upgrades_mut() = previous;

        let mut touched: Vec<Location> = Vec::new();
        for (location, index, item) in self.removed.drain(..).rev() {
            ctx.loadout.component_mut(location).insert_item(index, item);
            if !touched.contains(&location) {
                touched.push(location);
            }
        }
        for location in touched.into_iter().rev() {
            ctx.post(Some(location), ChangeKind::ItemAdded);
        }
        ctx.post(None, ChangeKind::UpgradeChanged);
        ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);

        self.state = OpState::Undone;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EquipRejection;
    use crate::core::types::ArmorSide;
    use crate::ops::{AddItem, SetArmor};
    use crate::testing;

    fn apply(loadout: &mut Loadout, op: &mut dyn Operation) -> Result<()> {
        op.apply(&mut EditContext::new(loadout))
    }

    fn set(loadout: &Loadout, family: UpgradeFamily, id: &str) -> SetUpgrade {
        SetUpgrade::by_id(loadout.catalog(), family, &UpgradeId::from(id)).unwrap()
    }

    #[test]
    fn test_structure_change_updates_mass_and_slots() {
        let mut loadout = testing::loadout();
        let before = loadout.clone();
        assert!((loadout.structure_mass() - 5.0).abs() < 1e-9);

        let mut op = set(&loadout, UpgradeFamily::Structure, "endo-steel");
        apply(&mut loadout, &mut op).unwrap();
        assert!((loadout.structure_mass() - 2.5).abs() < 1e-9);
        assert_eq!(loadout.upgrades().dynamic_slots(), 14);

        op.undo(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout, before);
    }

    #[test]
    fn test_bonus_slots_must_fit() {
        let mut loadout = testing::loadout();
        let mut endo = set(&loadout, UpgradeFamily::Structure, "endo-steel");
        apply(&mut loadout, &mut endo).unwrap();

        // 36 one-slot ammo bins leave 27 free slots
        let ammo = testing::item(&loadout, "ac-20-ammo");
        let fill = [
            (Location::LeftArm, 10),
            (Location::RightArm, 10),
            (Location::LeftTorso, 8),
            (Location::RightTorso, 8),
        ];
        for (location, count) in fill {
            for _ in 0..count {
                apply(&mut loadout, &mut AddItem::new(location, ammo.clone())).unwrap();
            }
        }
        assert_eq!(loadout.slots_free(), 27);

        let mut ferro = set(&loadout, UpgradeFamily::Armor, "ferro-fibrous");
        assert!(matches!(
            apply(&mut loadout, &mut ferro),
            Err(LoadoutError::Rejected(EquipRejection::NotEnoughSlots))
        ));

        let mut remove = crate::ops::RemoveItem::new(Location::LeftArm, ammo);
        apply(&mut loadout, &mut remove).unwrap();
        apply(&mut loadout, &mut ferro).unwrap();
        assert_eq!(loadout.upgrades().dynamic_slots(), 28);
    }

    #[test]
    fn test_armor_change_rescales_armor_mass() {
        let mut loadout = testing::loadout();
        apply(
            &mut loadout,
            &mut SetArmor::new(Location::CenterTorso, ArmorSide::Front, 64, true),
        )
        .unwrap();
        assert!((loadout.armor_mass() - 2.0).abs() < 1e-9);

        let mut ferro = set(&loadout, UpgradeFamily::Armor, "ferro-fibrous");
        apply(&mut loadout, &mut ferro).unwrap();
        assert!((loadout.armor_mass() - 64.0 / 35.84).abs() < 1e-9);
    }

    #[test]
    fn test_heat_sink_change_drops_equipped_heat_sinks() {
        let mut loadout = testing::loadout();
        let engine = testing::item(&loadout, "std-engine-300");
        let heat_sink = testing::item(&loadout, "heat-sink");
        apply(&mut loadout, &mut AddItem::new(Location::CenterTorso, engine)).unwrap();
        for location in [Location::CenterTorso, Location::CenterTorso, Location::LeftLeg] {
            apply(&mut loadout, &mut AddItem::new(location, heat_sink.clone())).unwrap();
        }
        let snapshot = loadout.clone();

        let mut op = set(&loadout, UpgradeFamily::HeatSinks, "double-heat-sinks");
        apply(&mut loadout, &mut op).unwrap();
        assert_eq!(op.removed_heat_sinks(), 3);
        assert_eq!(loadout.heat_sinks(), 0);

        // Only the new type is accepted now
        assert_eq!(
            loadout.can_equip(&heat_sink),
            Err(EquipRejection::IncompatibleUpgrade)
        );
        let double = testing::item(&loadout, "double-heat-sink");
        assert!(loadout.can_equip_at(Location::CenterTorso, &double).is_ok());

        op.undo(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout, snapshot);
    }

    #[test]
    fn test_guidance_change_checks_tonnage() {
        let mut loadout = testing::loadout();
        let lrm = testing::item(&loadout, "lrm-10");
        apply(&mut loadout, &mut AddItem::new(Location::LeftTorso, lrm.clone())).unwrap();
        apply(&mut loadout, &mut AddItem::new(Location::LeftTorso, lrm)).unwrap();

        let mut artemis = set(&loadout, UpgradeFamily::Guidance, "artemis");
        apply(&mut loadout, &mut artemis).unwrap();
        assert!((loadout.guidance_mass() - 2.0).abs() < 1e-9);
        artemis.undo(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout.guidance_mass(), 0.0);

        let fill = [
            (Location::RightArm, "ac-20"),
            (Location::CenterTorso, "std-engine-300"),
        ];
        for (location, id) in fill {
            let item = testing::item(&loadout, id);
            apply(&mut loadout, &mut AddItem::new(location, item)).unwrap();
        }
        let ammo = testing::item(&loadout, "ac-20-ammo");
        for _ in 0..5 {
            apply(&mut loadout, &mut AddItem::new(Location::RightTorso, ammo.clone())).unwrap();
        }
        assert!((loadout.free_mass() - 1.0).abs() < 1e-9);

        // Two guided launchers need two more tons
        assert!(matches!(
            apply(&mut loadout, &mut artemis),
            Err(LoadoutError::Rejected(EquipRejection::NotEnoughTonnage))
        ));
    }

    #[test]
    fn test_unknown_upgrade() {
        let loadout = testing::loadout();
        let err = SetUpgrade::by_id(
            loadout.catalog(),
            UpgradeFamily::Armor,
            &UpgradeId::from("endo-steel"),
        )
        .unwrap_err();
        assert!(matches!(err, LoadoutError::UnknownUpgrade(_)));
    }
}
