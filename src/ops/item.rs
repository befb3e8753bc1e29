//! Adding and removing equipment
//!
//! Engines carry side effects: an XL-type engine mirrors an internal item
//! into both side torsos, and heat sinks riding the engine leave with it.

use std::any::Any;
use std::sync::Arc;

use crate::catalog::{Catalog, Item};
use crate::core::error::{EquipRejection, LoadoutError, Result};
use crate::core::types::{ItemId, Location};
use crate::messages::ChangeKind;
use crate::ops::{EditContext, OpState, Operation};

const SIDE_TORSOS: [Location; 2] = [Location::LeftTorso, Location::RightTorso];

/// An item taken out of a component, with where it was
#[derive(Debug, Clone)]
struct Removal {
    location: Location,
    index: usize,
    item: Arc<Item>,
}

/// Equip an item in a location
#[derive(Debug)]
pub struct AddItem {
    location: Location,
    item: Arc<Item>,
    /// Side torso item added alongside an XL engine
    mirror: Option<Arc<Item>>,
    state: OpState,
}

impl AddItem {
    pub fn new(location: Location, item: Arc<Item>) -> Self {
        Self {
            location,
            item,
            mirror: None,
            state: OpState::Created,
        }
    }

    /// Look `id` up in the catalog
    pub fn by_id(catalog: &Catalog, location: Location, id: &ItemId) -> Result<Self> {
        Ok(Self::new(location, catalog.item(id)?))
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn item(&self) -> &Arc<Item> {
        &self.item
    }
}

impl Operation for AddItem {
    fn describe(&self) -> String {
        format!("Add {} to {}", self.item.name, self.location)
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("AddItem")?;

        if let Err(reason) = ctx.loadout.can_equip_at(self.location, &self.item) {
            tracing::warn!("{} rejected: {}", self.describe(), reason);
            return Err(reason.into());
        }
        let mirror = match self.item.side_internal() {
            Some(id) => Some(ctx.loadout.catalog().item(id)?),
            None => None,
        };

        tracing::trace!("{}", self.describe());
        ctx.loadout
            .component_mut(self.location)
            .add_item(Arc::clone(&self.item));
        ctx.post(Some(self.location), ChangeKind::ItemAdded);

        if let Some(mirror) = &mirror {
            for side in SIDE_TORSOS {
                ctx.loadout.component_mut(side).add_item(Arc::clone(mirror));
                ctx.post(Some(side), ChangeKind::ItemAdded);
            }
        }
        ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);

        self.mirror = mirror;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("AddItem")?;

        ctx.loadout
            .component_mut(self.location)
            .remove_item(&self.item)?;
        ctx.post(Some(self.location), ChangeKind::ItemRemoved);

        if let Some(mirror) = self.mirror.take() {
            for side in SIDE_TORSOS {
                ctx.loadout.component_mut(side).remove_item(&mirror)?;
                ctx.post(Some(side), ChangeKind::ItemRemoved);
            }
        }
        ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);

        self.state = OpState::Undone;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Unequip an item from a location
#[derive(Debug)]
pub struct RemoveItem {
    location: Location,
    item: Arc<Item>,
    /// Everything taken out by the last apply, in removal order
    removed: Vec<Removal>,
    state: OpState,
}

impl RemoveItem {
    pub fn new(location: Location, item: Arc<Item>) -> Self {
        Self {
            location,
            item,
            removed: Vec::new(),
            state: OpState::Created,
        }
    }

    pub fn by_id(catalog: &Catalog, location: Location, id: &ItemId) -> Result<Self> {
        Ok(Self::new(location, catalog.item(id)?))
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn item(&self) -> &Arc<Item> {
        &self.item
    }

    /// Heat sinks that rode the engine on the last apply
    pub fn harvested_heat_sinks(&self) -> usize {
        self.removed
            .iter()
            .filter(|r| r.location == self.location && r.item.is_heat_sink())
            .count()
    }
}

impl Operation for RemoveItem {
    fn describe(&self) -> String {
        format!("Remove {} from {}", self.item.name, self.location)
    }

    fn apply(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_apply("RemoveItem")?;

        if self.item.is_internal() {
            return Err(EquipRejection::InternalItem.into());
        }

        let component = ctx.loadout.component(self.location);
        if !component.contains(&self.item) {
            return Err(LoadoutError::ItemNotFound {
                item: self.item.id.clone(),
                location: self.location,
            });
        }

        // Resolve every side effect before touching state
        let (harvest, heat_sink) = if self.item.is_engine() {
            let heat_sink = component
                .items()
                .iter()
                .rev()
                .find(|item| item.is_heat_sink())
                .cloned();
            (component.engine_heat_sinks(), heat_sink)
        } else {
            (0, None)
        };
        let mirror = match self.item.side_internal() {
            Some(id) => {
                let mirror = ctx.loadout.catalog().item(id)?;
                for side in SIDE_TORSOS {
                    if !ctx.loadout.component(side).contains(&mirror) {
                        return Err(LoadoutError::ItemNotFound {
                            item: mirror.id.clone(),
                            location: side,
                        });
                    }
                }
                Some(mirror)
            }
            None => None,
        };

        tracing::trace!("{}", self.describe());
        let mut removed = Vec::new();
        let component = ctx.loadout.component_mut(self.location);
        let index = component.remove_item(&self.item)?;
        removed.push(Removal {
            location: self.location,
            index,
            item: Arc::clone(&self.item),
        });
        if let Some(heat_sink) = heat_sink {
            for _ in 0..harvest {
                let index = component.remove_item(&heat_sink)?;
                removed.push(Removal {
                    location: self.location,
                    index,
                    item: Arc::clone(&heat_sink),
                });
            }
        }
        ctx.post(Some(self.location), ChangeKind::ItemRemoved);

        if let Some(mirror) = mirror {
            for side in SIDE_TORSOS {
                let index = ctx.loadout.component_mut(side).remove_item(&mirror)?;
                removed.push(Removal {
                    location: side,
                    index,
                    item: Arc::clone(&mirror),
                });
                ctx.post(Some(side), ChangeKind::ItemRemoved);
            }
        }
        ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);

        self.removed = removed;
        self.state = OpState::Applied;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<()> {
        self.state.check_undo("RemoveItem")?;

        let mut touched: Vec<Location> = Vec::new();
        for removal in self.removed.drain(..).rev() {
            ctx.loadout
                .component_mut(removal.location)
                .insert_item(removal.index, removal.item);
            if !touched.contains(&removal.location) {
                touched.push(removal.location);
            }
        }
        for location in touched.into_iter().rev() {
            ctx.post(Some(location), ChangeKind::ItemAdded);
        }
        ctx.post(None, ChangeKind::ArmorDistributionUpdateRequest);

        self.state = OpState::Undone;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
