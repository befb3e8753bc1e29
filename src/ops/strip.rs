//! Clearing components and whole loadouts

use std::any::Any;

use crate::core::error::Result;
use crate::core::types::Location;
use crate::loadout::Loadout;
use crate::ops::{apply_all, undo_all, EditContext, OpState, Operation, RemoveItem, SetArmor};

/// Remove every removable item and all armor from one component.
///
/// Children are planned from the loadout on the first apply and replayed
/// unchanged on redo.
#[derive(Debug)]
pub struct StripComponent {
    location: Location,
    children: Vec<Box<dyn Operation>>,
    state: OpState,
}

impl StripComponent {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            children: Vec::new(),
            state: OpState::Created,
        }
    }

    fn plan(&mut self, loadout: &Loadout) {
        self.children.clear();
        let component = loadout.component(self.location);

        // Heat sinks riding the engine leave together with it
        let mut riding = component.engine_heat_sinks();
        for item in component.removable_items() {
            if item.is_heat_sink() && riding > 0 {
                riding -= 1;
                continue;
            }
            self.children
                .push(Box::new(RemoveItem::new(self.location, item.clone())));
        }

        for &side in self.location.armor_sides() {
            self.children
                .push(Box::new(SetArmor::new(self.location, side, 0, true)));
        }
    }
}

impl Operation for StripComponent {
    fn describe(&self) -> String {
        format!("Strip {}", self.location)
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("StripComponent")?;
        if self.state == OpState::Created {
            self.plan(ctx.loadout);
        }
        apply_all(&mut self.children, ctx)?;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("StripComponent")?;
        undo_all(&mut self.children, ctx)?;
        self.state = OpState::Undone;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Strip every component of the loadout
#[derive(Debug)]
pub struct StripLoadout {
    children: Vec<Box<dyn Operation>>,
    state: OpState,
}

impl StripLoadout {
    pub fn new() -> Self {
        Self {
            children: Location::ALL
                .iter()
                .map(|&location| Box::new(StripComponent::new(location)) as Box<dyn Operation>)
                .collect(),
            state: OpState::Created,
        }
    }
}

impl Default for StripLoadout {
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for StripLoadout {
    fn describe(&self) -> String {
        "Strip loadout".to_string()
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("StripLoadout")?;
        apply_all(&mut self.children, ctx)?;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("StripLoadout")?;
        undo_all(&mut self.children, ctx)?;
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
    use crate::core::types::ArmorSide;
    use crate::ops::AddItem;
    use crate::testing;

    fn apply(loadout: &mut Loadout, op: &mut dyn Operation) {
        op.apply(&mut EditContext::new(loadout)).unwrap();
    }

    fn equipped_center_torso() -> Loadout {
        let mut loadout = testing::loadout();
        for id in ["heat-sink", "xl-engine-300", "heat-sink", "heat-sink", "medium-laser"] {
            let item = testing::item(&loadout, id);
            apply(&mut loadout, &mut AddItem::new(Location::CenterTorso, item));
        }
        apply(
            &mut loadout,
            &mut SetArmor::new(Location::CenterTorso, ArmorSide::Front, 30, true),
        );
        apply(
            &mut loadout,
            &mut SetArmor::new(Location::CenterTorso, ArmorSide::Back, 10, true),
        );
        loadout
    }

    #[test]
    fn test_strip_component_clears_items_and_armor() {
        let mut loadout = equipped_center_torso();
        let snapshot = loadout.clone();

        let mut strip = StripComponent::new(Location::CenterTorso);
        apply(&mut loadout, &mut strip);

        let ct = loadout.component(Location::CenterTorso);
        assert_eq!(ct.removable_items().count(), 0);
        assert_eq!(ct.armor_total(), 0);
        assert!(loadout.engine().is_none());
        assert_eq!(loadout.component(Location::LeftTorso).items().len(), 0);
        assert!(loadout.validate().is_ok());

        strip.undo(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout, snapshot);

        // Redo replays the same plan
        apply(&mut loadout, &mut strip);
        assert_eq!(loadout.component(Location::CenterTorso).removable_items().count(), 0);
    }

    #[test]
    fn test_replanning_replaces_children() {
        let loadout = equipped_center_torso();
        let mut strip = StripComponent::new(Location::CenterTorso);
        strip.plan(&loadout);
        let planned = strip.children.len();
        // Engine, laser, one paying heat sink, two armor sides
        assert_eq!(planned, 5);

        strip.plan(&loadout);
        assert_eq!(strip.children.len(), planned);
    }

    #[test]
    fn test_strip_side_torso_keeps_engine_mirror() {
        let mut loadout = equipped_center_torso();
        let case = testing::item(&loadout, "case");
        apply(&mut loadout, &mut AddItem::new(Location::LeftTorso, case));

        apply(&mut loadout, &mut StripComponent::new(Location::LeftTorso));
        let lt = loadout.component(Location::LeftTorso);
        assert_eq!(lt.items().len(), 1);
        assert!(lt.items()[0].is_internal());
    }

    #[test]
    fn test_strip_loadout_round_trip() {
        let mut loadout = equipped_center_torso();
        let laser = testing::item(&loadout, "medium-laser");
        apply(&mut loadout, &mut AddItem::new(Location::LeftArm, laser));
        let snapshot = loadout.clone();

        let mut strip = StripLoadout::new();
        apply(&mut loadout, &mut strip);
        assert_eq!(loadout.items_mass(), 0.0);
        assert_eq!(loadout.armor_points(), 0);

        strip.undo(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout, snapshot);
    }
}
