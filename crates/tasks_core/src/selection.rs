//! The player's current selection, as the command layer sees it.
//!
//! Selected entities are composed of optional components; an action that
//! needs a component the selection lacks fails with a structural error.
//! The host's input layer keeps this context in sync with what is actually
//! highlighted on screen.

use serde::{Deserialize, Serialize};

use crate::buildings::ResourceGenerator;
use crate::factions::FactionId;
use crate::math::Vec2Fixed;
use crate::units::{AttackModes, Invisibility, Transport, Wander};
use crate::EntityId;

/// A selected unit with the components immediate actions can touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedUnit {
    /// Entity id.
    pub id: EntityId,
    /// Owning faction.
    pub faction: FactionId,
    /// Current position.
    pub position: Vec2Fixed,
    /// Transport component, if the unit carries passengers.
    pub transport: Option<Transport>,
    /// Invisibility component.
    pub invisibility: Option<Invisibility>,
    /// Selectable attack modes.
    pub attack_modes: Option<AttackModes>,
    /// Wandering behavior.
    pub wander: Option<Wander>,
}

impl SelectedUnit {
    /// Create a selected unit with no optional components.
    #[must_use]
    pub fn new(id: EntityId, faction: FactionId, position: Vec2Fixed) -> Self {
        Self {
            id,
            faction,
            position,
            transport: None,
            invisibility: None,
            attack_modes: None,
            wander: None,
        }
    }
}

/// A selected building with the components immediate actions can touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedBuilding {
    /// Entity id.
    pub id: EntityId,
    /// Owning faction.
    pub faction: FactionId,
    /// Resource generator, if the building produces collectable batches.
    pub resource_gen: Option<ResourceGenerator>,
    /// Transport component, if the building garrisons units.
    pub transport: Option<Transport>,
}

impl SelectedBuilding {
    /// Create a selected building with no optional components.
    #[must_use]
    pub fn new(id: EntityId, faction: FactionId) -> Self {
        Self {
            id,
            faction,
            resource_gen: None,
            transport: None,
        }
    }
}

/// The current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionContext {
    /// Selected building, if any.
    pub building: Option<SelectedBuilding>,
    /// Selected units, in selection order.
    pub units: Vec<SelectedUnit>,
    /// The task holder whose panel is open, if any.
    pub holder: Option<EntityId>,
}

impl SelectionContext {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The first selected unit.
    #[must_use]
    pub fn first_unit(&self) -> Option<&SelectedUnit> {
        self.units.first()
    }

    /// The first selected unit, mutably.
    pub fn first_unit_mut(&mut self) -> Option<&mut SelectedUnit> {
        self.units.first_mut()
    }

    /// Check whether a holder's panel is the open one.
    #[must_use]
    pub fn is_holder_selected(&self, holder: EntityId) -> bool {
        self.holder == Some(holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_unit_order() {
        let mut selection = SelectionContext::new();
        assert!(selection.first_unit().is_none());

        selection
            .units
            .push(SelectedUnit::new(4, FactionId::new(0), Vec2Fixed::ZERO));
        selection
            .units
            .push(SelectedUnit::new(9, FactionId::new(0), Vec2Fixed::ZERO));

        assert_eq!(selection.first_unit().unwrap().id, 4);
    }

    #[test]
    fn test_holder_selection() {
        let mut selection = SelectionContext::new();
        assert!(!selection.is_holder_selected(1));

        selection.holder = Some(1);
        assert!(selection.is_holder_selected(1));
        assert!(!selection.is_holder_selected(2));
    }
}
