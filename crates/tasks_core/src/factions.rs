//! Faction identity and per-faction command bookkeeping.
//!
//! Each faction carries the shared state the command layer mutates when a
//! task is approved: the population counters and the per-type production
//! caps. Resource stockpiles live in [`crate::economy`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingTypeId, UnitTypeId};
use crate::error::{Result, TaskError};

/// Unique identifier for a faction (player slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u8);

impl FactionId {
    /// Create a new faction id.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "faction {}", self.0)
    }
}

/// Population counters for one faction.
///
/// Population is reserved optimistically when a unit-creation task is
/// approved, before production completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Population {
    /// Units alive plus units reserved in production queues.
    pub current: u32,
    /// Population cap.
    pub max: u32,
}

impl Population {
    /// Create population counters with the given cap.
    #[must_use]
    pub const fn new(current: u32, max: u32) -> Self {
        Self { current, max }
    }

    /// Check whether there is room for one more unit.
    #[must_use]
    pub const fn has_room(&self) -> bool {
        self.current < self.max
    }

    /// Reserve one population slot.
    pub fn reserve(&mut self) {
        self.current += 1;
    }

    /// Release one population slot (e.g. a unit died).
    pub fn release(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

/// Per-type production caps for one faction.
///
/// Tracks how many units/buildings of each type have been queued or placed
/// against an optional cap per type. Unit and building types are distinct
/// index spaces with distinct typed ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionCaps {
    unit_counts: HashMap<UnitTypeId, u32>,
    unit_caps: HashMap<UnitTypeId, u32>,
    building_counts: HashMap<BuildingTypeId, u32>,
    building_caps: HashMap<BuildingTypeId, u32>,
}

impl ProductionCaps {
    /// Create an empty cap table (everything uncapped).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the creation cap for a unit type.
    pub fn set_unit_cap(&mut self, unit: UnitTypeId, cap: u32) {
        self.unit_caps.insert(unit, cap);
    }

    /// Set the placement cap for a building type.
    pub fn set_building_cap(&mut self, building: BuildingTypeId, cap: u32) {
        self.building_caps.insert(building, cap);
    }

    /// Check whether a unit type has hit its creation limit.
    ///
    /// Types without a configured cap are never limited.
    #[must_use]
    pub fn unit_limit_reached(&self, unit: UnitTypeId) -> bool {
        match self.unit_caps.get(&unit) {
            Some(cap) => self.unit_counts.get(&unit).copied().unwrap_or(0) >= *cap,
            None => false,
        }
    }

    /// Check whether a building type has hit its placement limit.
    #[must_use]
    pub fn building_limit_reached(&self, building: BuildingTypeId) -> bool {
        match self.building_caps.get(&building) {
            Some(cap) => self.building_counts.get(&building).copied().unwrap_or(0) >= *cap,
            None => false,
        }
    }

    /// Record one queued/produced unit of the given type.
    pub fn record_unit_queued(&mut self, unit: UnitTypeId) {
        *self.unit_counts.entry(unit).or_insert(0) += 1;
    }

    /// Record one placed building of the given type.
    pub fn record_building_placed(&mut self, building: BuildingTypeId) {
        *self.building_counts.entry(building).or_insert(0) += 1;
    }

    /// Current count for a unit type.
    #[must_use]
    pub fn unit_count(&self, unit: UnitTypeId) -> u32 {
        self.unit_counts.get(&unit).copied().unwrap_or(0)
    }

    /// Current count for a building type.
    #[must_use]
    pub fn building_count(&self, building: BuildingTypeId) -> u32 {
        self.building_counts.get(&building).copied().unwrap_or(0)
    }
}

/// Shared command-layer state for one faction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionState {
    /// Population counters.
    pub population: Population,
    /// Per-type production caps.
    pub caps: ProductionCaps,
}

impl FactionState {
    /// Create faction state with the given population cap.
    #[must_use]
    pub fn new(max_population: u32) -> Self {
        Self {
            population: Population::new(0, max_population),
            caps: ProductionCaps::new(),
        }
    }
}

/// Registry of all factions in the match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionRegistry {
    factions: HashMap<FactionId, FactionState>,
}

impl FactionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factions: HashMap::new(),
        }
    }

    /// Register a faction, replacing any previous state for the id.
    pub fn register(&mut self, id: FactionId, state: FactionState) {
        self.factions.insert(id, state);
    }

    /// Get a faction's state.
    pub fn get(&self, id: FactionId) -> Result<&FactionState> {
        self.factions.get(&id).ok_or(TaskError::UnknownFaction(id))
    }

    /// Get a faction's state mutably.
    pub fn get_mut(&mut self, id: FactionId) -> Result<&mut FactionState> {
        self.factions
            .get_mut(&id)
            .ok_or(TaskError::UnknownFaction(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_room() {
        let mut pop = Population::new(0, 2);
        assert!(pop.has_room());

        pop.reserve();
        pop.reserve();
        assert_eq!(pop.current, 2);
        assert!(!pop.has_room());

        pop.release();
        assert!(pop.has_room());

        // Release never underflows
        pop.release();
        pop.release();
        assert_eq!(pop.current, 0);
    }

    #[test]
    fn test_unit_caps() {
        let mut caps = ProductionCaps::new();
        let scout = UnitTypeId::new(1);

        // Uncapped types are never limited
        assert!(!caps.unit_limit_reached(scout));

        caps.set_unit_cap(scout, 2);
        caps.record_unit_queued(scout);
        assert!(!caps.unit_limit_reached(scout));

        caps.record_unit_queued(scout);
        assert!(caps.unit_limit_reached(scout));
        assert_eq!(caps.unit_count(scout), 2);
    }

    #[test]
    fn test_building_caps_are_a_separate_space() {
        let mut caps = ProductionCaps::new();
        caps.set_unit_cap(UnitTypeId::new(7), 0);

        // A building type with the same raw value is unaffected
        assert!(caps.unit_limit_reached(UnitTypeId::new(7)));
        assert!(!caps.building_limit_reached(BuildingTypeId::new(7)));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = FactionRegistry::new();
        registry.register(FactionId::new(0), FactionState::new(10));

        assert!(registry.get(FactionId::new(0)).is_ok());
        assert!(matches!(
            registry.get(FactionId::new(3)),
            Err(TaskError::UnknownFaction(FactionId(3)))
        ));
    }
}
