//! Armor edits

use std::any::Any;

use crate::core::error::{LoadoutError, Result};
use crate::core::types::{ArmorSide, Location};
use crate::messages::ChangeKind;
use crate::ops::{apply_all, undo_all, EditContext, OpState, Operation};

/// Set the armor of one side of a component
#[derive(Debug)]
pub struct SetArmor {
    location: Location,
    side: ArmorSide,
    amount: u32,
    manual: bool,
    /// Amount and manual flag overwritten by the last apply
    previous: Option<(u32, bool)>,
    state: OpState,
}

impl SetArmor {
    pub fn new(location: Location, side: ArmorSide, amount: u32, manual: bool) -> Self {
        Self {
            location,
            side,
            amount,
            manual,
            previous: None,
            state: OpState::Created,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn side(&self) -> ArmorSide {
        self.side
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }
}

impl Operation for SetArmor {
    fn describe(&self) -> String {
        format!("Set {} {} to {}", self.location, self.side, self.amount)
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("SetArmor")?;

        if let Err(reason) = ctx
            .loadout
            .can_set_armor(self.location, self.side, self.amount)
        {
            tracing::warn!("{} rejected: {}", self.describe(), reason);
            return Err(reason.into());
        }

        let component = ctx.loadout.component_mut(self.location);
        self.previous = Some((component.armor(self.side), component.has_manual_armor()));
        component.set_armor(self.side, self.amount, self.manual);
        tracing::trace!("{}", self.describe());

        ctx.post(Some(self.location), ChangeKind::ArmorChanged);
        if self.manual {
            ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);
        }

        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("SetArmor")?;
        let (amount, manual) = self
            .previous
            .take()
            .ok_or_else(|| LoadoutError::InvalidState("SetArmor has no recorded armor".into()))?;

        ctx.loadout
            .component_mut(self.location)
            .set_armor(self.side, amount, manual);
        ctx.post(Some(self.location), ChangeKind::ArmorChanged);
        if self.manual {
            ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);
        }

        self.state = OpState::Undone;
        Ok(())
    }

    fn can_coalesce(&self, previous: &dyn Operation) -> bool {
        previous
            .as_any()
            .downcast_ref::<SetArmor>()
            .is_some_and(|prev| {
                prev.location == self.location
                    && prev.side == self.side
                    && prev.manual == self.manual
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Set the same armor on a component and its mirror
#[derive(Debug)]
pub struct SymmetricArmor {
    location: Location,
    mirror: Location,
    manual: bool,
    children: Vec<Box<dyn Operation>>,
    state: OpState,
}

impl SymmetricArmor {
    /// Fails for locations without a mirror (head, center torso)
    pub fn new(location: Location, side: ArmorSide, amount: u32, manual: bool) -> Result<Self> {
        let mirror = location.mirror().ok_or(LoadoutError::NoMirror(location))?;
        Ok(Self {
            location,
            mirror,
            manual,
            children: vec![
                Box::new(SetArmor::new(location, side, amount, manual)),
                Box::new(SetArmor::new(mirror, side, amount, manual)),
            ],
            state: OpState::Created,
        })
    }

    fn same_pair(&self, other: &SymmetricArmor) -> bool {
        (self.location == other.location && self.mirror == other.mirror)
            || (self.location == other.mirror && self.mirror == other.location)
    }
}

impl Operation for SymmetricArmor {
    fn describe(&self) -> String {
        format!("Set symmetric armor on {} and {}", self.location, self.mirror)
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("SymmetricArmor")?;
        apply_all(&mut self.children, ctx)?;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("SymmetricArmor")?;
        undo_all(&mut self.children, ctx)?;
        self.state = OpState::Undone;
        Ok(())
    }

    fn can_coalesce(&self, previous: &dyn Operation) -> bool {
        previous
            .as_any()
            .downcast_ref::<SymmetricArmor>()
            .is_some_and(|prev| prev.manual == self.manual && self.same_pair(prev))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
