//! Resource costs and per-faction stockpiles.
//!
//! The command layer only needs two operations from the economy: an
//! affordability check before a task is approved and a debit when it is.
//! Credits exist for the resource-generator collection path.
//!
//! All amounts are integers; the only fractional value is the affordability
//! scale factor, which uses fixed-point math.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::factions::FactionId;
use crate::math::Fixed;

/// Interned identifier for a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub u16);

impl ResourceId {
    /// Create a new resource id.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Maps design-time resource names to interned ids.
///
/// Data files reference resources by name ("wood", "alloy"); the runtime
/// works with cheap numeric ids assigned in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRegistry {
    names: Vec<String>,
    by_name: HashMap<String, ResourceId>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a resource name, returning its id.
    ///
    /// Interning the same name twice returns the same id.
    pub fn intern(&mut self, name: &str) -> ResourceId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = ResourceId::new(self.names.len() as u16);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up an already-interned name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name).copied()
    }

    /// The name a resource id was interned under.
    #[must_use]
    pub fn name_of(&self, id: ResourceId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }
}

/// One line of a task's cost list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    /// The resource being charged.
    pub resource: ResourceId,
    /// Amount charged.
    pub amount: i32,
}

impl ResourceCost {
    /// Create a new cost line.
    #[must_use]
    pub const fn new(resource: ResourceId, amount: i32) -> Self {
        Self { resource, amount }
    }
}

/// One faction's resource stockpile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stockpile {
    amounts: HashMap<ResourceId, i32>,
}

impl Stockpile {
    /// Create an empty stockpile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current amount of a resource.
    #[must_use]
    pub fn amount(&self, resource: ResourceId) -> i32 {
        self.amounts.get(&resource).copied().unwrap_or(0)
    }

    /// Set the amount of a resource.
    pub fn set(&mut self, resource: ResourceId, amount: i32) {
        self.amounts.insert(resource, amount);
    }

    /// Check whether every line of a cost list is covered.
    ///
    /// `scale` multiplies each cost line before the comparison; pass
    /// `Fixed::ONE` for the plain check. Scaled amounts round up, so a
    /// faction cannot afford by rounding.
    #[must_use]
    pub fn affordable(&self, costs: &[ResourceCost], scale: Fixed) -> bool {
        costs.iter().all(|cost| {
            let scaled: i32 = (Fixed::from_num(cost.amount) * scale).ceil().to_num();
            self.amount(cost.resource) >= scaled
        })
    }

    /// Debit a cost list from the stockpile.
    ///
    /// Callers check [`Stockpile::affordable`] first; debiting can push an
    /// amount negative if they do not, which is intentional for autonomous
    /// callers that pre-validate elsewhere.
    pub fn debit(&mut self, costs: &[ResourceCost]) {
        for cost in costs {
            *self.amounts.entry(cost.resource).or_insert(0) -= cost.amount;
        }
    }

    /// Credit a single amount of a resource.
    pub fn credit(&mut self, resource: ResourceId, amount: i32) {
        *self.amounts.entry(resource).or_insert(0) += amount;
    }
}

/// Per-faction stockpiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    stockpiles: HashMap<FactionId, Stockpile>,
}

impl ResourceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a faction's stockpile, creating an empty one on first access.
    pub fn stockpile_mut(&mut self, faction: FactionId) -> &mut Stockpile {
        self.stockpiles.entry(faction).or_default()
    }

    /// Get a faction's stockpile.
    #[must_use]
    pub fn stockpile(&self, faction: FactionId) -> Option<&Stockpile> {
        self.stockpiles.get(&faction)
    }

    /// Check affordability for a faction.
    ///
    /// Factions without a stockpile can only afford empty cost lists.
    #[must_use]
    pub fn affordable(&self, faction: FactionId, costs: &[ResourceCost], scale: Fixed) -> bool {
        match self.stockpiles.get(&faction) {
            Some(stockpile) => stockpile.affordable(costs, scale),
            None => costs.is_empty(),
        }
    }

    /// Debit a cost list from a faction's stockpile.
    pub fn debit(&mut self, faction: FactionId, costs: &[ResourceCost]) {
        self.stockpile_mut(faction).debit(costs);
    }

    /// Credit a resource amount to a faction's stockpile.
    pub fn credit(&mut self, faction: FactionId, resource: ResourceId, amount: i32) {
        self.stockpile_mut(faction).credit(resource, amount);
    }
}
