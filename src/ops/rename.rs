use std::any::Any;

use crate::core::error::{LoadoutError, Result};
use crate::messages::ChangeKind;
use crate::ops::{EditContext, OpState, Operation};

/// Give the loadout a new name
#[derive(Debug)]
pub struct RenameLoadout {
    name: String,
    previous: Option<String>,
    state: OpState,
}

impl RenameLoadout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            previous: None,
            state: OpState::Created,
        }
    }
}

impl Operation for RenameLoadout {
    fn describe(&self) -> String {
        format!("Rename to {}", self.name)
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("RenameLoadout")?;
        self.previous = Some(ctx.loadout.name().to_string());
        ctx.loadout.set_name(self.name.clone());
        ctx.post(None, ChangeKind::Renamed);
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("RenameLoadout")?;
        let previous = self.previous.take().ok_or_else(|| {
            LoadoutError::InvalidState("RenameLoadout has no recorded name".into())
        })?;
        ctx.loadout.set_name(previous);
        ctx.post(None, ChangeKind::Renamed);
        self.state = OpState::Undone;
        Ok(())
    }

    // Typing a name produces one edit per keystroke
    fn can_coalesce(&self, previous: &dyn Operation) -> bool {
        previous.as_any().is::<RenameLoadout>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_rename_and_undo() {
        let mut loadout = testing::loadout();
        let original = loadout.name().to_string();

        let mut op = RenameLoadout::new("Brawler");
        op.apply(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout.name(), "Brawler");

        op.undo(&mut EditContext::new(&mut loadout)).unwrap();
        assert_eq!(loadout.name(), original);
    }

    #[test]
    fn test_renames_coalesce() {
        let first = RenameLoadout::new("B");
        let second = RenameLoadout::new("Br");
        assert!(second.can_coalesce(&first));
    }
}
