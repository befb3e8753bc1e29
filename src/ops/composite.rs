//! Generic ordered group of operations

use std::any::Any;

use crate::core::error::Result;
use crate::ops::{apply_all, undo_all, EditContext, OpState, Operation};

/// Applies children in order as one undoable edit
#[derive(Debug)]
pub struct CompositeOperation {
    description: String,
    children: Vec<Box<dyn Operation>>,
    state: OpState,
}

impl CompositeOperation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            children: Vec::new(),
            state: OpState::Created,
        }
    }

    pub fn with(mut self, op: impl Operation + 'static) -> Self {
        self.push(Box::new(op));
        self
    }

    pub fn push(&mut self, op: Box<dyn Operation>) {
        self.children.push(op);
    }

    pub fn children(&self) -> &[Box<dyn Operation>] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Operation for CompositeOperation {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("CompositeOperation")?;
        apply_all(&mut self.children, ctx)?;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("CompositeOperation")?;
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
    use crate::core::error::LoadoutError;
    use crate::core::types::{HardpointType, Location};
    use crate::ops::AddItem;
    use crate::testing;

    #[test]
    fn test_children_apply_in_order_and_undo_in_reverse() {
        let mut loadout = testing::loadout();
        let before = loadout.clone();
        let laser = testing::item(&loadout, "medium-laser");

        let mut op = CompositeOperation::new("Two lasers")
            .with(AddItem::new(Location::LeftArm, laser.clone()))
            .with(AddItem::new(Location::LeftArm, laser));

        let mut ctx = EditContext::new(&mut loadout);
        op.apply(&mut ctx).unwrap();
        let arm = ctx.loadout.component(Location::LeftArm);
        assert_eq!(arm.hardpoints_used(HardpointType::Energy), 2);

        op.undo(&mut ctx).unwrap();
        assert_eq!(*ctx.loadout, before);
    }

    #[test]
    fn test_failed_child_rolls_back_applied_children() {
        let mut loadout = testing::loadout();
        let before = loadout.clone();
        let laser = testing::item(&loadout, "medium-laser");

        // Left arm has two energy hardpoints; the third laser fails
        let mut op = CompositeOperation::new("Three lasers")
            .with(AddItem::new(Location::LeftArm, laser.clone()))
            .with(AddItem::new(Location::LeftArm, laser.clone()))
            .with(AddItem::new(Location::LeftArm, laser));

        let mut ctx = EditContext::new(&mut loadout);
        let err = op.apply(&mut ctx).unwrap_err();
        assert!(matches!(err, LoadoutError::Rejected(_)));
        assert_eq!(*ctx.loadout, before);

        // Never applied, so undo is a contract violation
        assert!(matches!(
            op.undo(&mut ctx),
            Err(LoadoutError::InvalidState(_))
        ));
    }
}
