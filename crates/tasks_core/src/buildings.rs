//! Building-side components driven by immediate actions.

use serde::{Deserialize, Serialize};

use crate::catalog::BuildingTypeId;
use crate::economy::ResourceId;

/// Index into a generator's ready-batch list.
///
/// Distinct from [`crate::catalog::TaskKey`]; batch indices and task keys
/// are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchIndex(pub usize);

impl std::fmt::Display for BatchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// A batch of generated resources waiting to be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBatch {
    /// The generated resource.
    pub resource: ResourceId,
    /// Amount in the batch.
    pub amount: i32,
}

/// Resource generator component for buildings that produce resources over
/// time and hold them until the player collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGenerator {
    /// The generated resource.
    pub resource: ResourceId,
    /// Amount per generated batch.
    pub batch_amount: i32,
    /// Ticks between batches.
    pub period: u32,
    /// Maximum batches held before generation pauses.
    pub max_ready: usize,
    /// Batches ready to collect.
    pub ready: Vec<ResourceBatch>,
    timer: u32,
}

impl ResourceGenerator {
    /// Create a generator producing `batch_amount` of `resource` every
    /// `period` ticks, holding at most `max_ready` batches.
    #[must_use]
    pub fn new(resource: ResourceId, batch_amount: i32, period: u32, max_ready: usize) -> Self {
        Self {
            resource,
            batch_amount,
            period,
            max_ready,
            ready: Vec::new(),
            timer: period,
        }
    }

    /// Advance generation by one tick.
    ///
    /// Returns `true` when a new batch became ready. Generation pauses
    /// while the ready list is full.
    pub fn tick(&mut self) -> bool {
        if self.ready.len() >= self.max_ready {
            return false;
        }
        self.timer = self.timer.saturating_sub(1);
        if self.timer > 0 {
            return false;
        }
        self.ready.push(ResourceBatch {
            resource: self.resource,
            amount: self.batch_amount,
        });
        self.timer = self.period;
        true
    }

    /// Take a ready batch.
    #[must_use]
    pub fn collect(&mut self, batch: BatchIndex) -> Option<ResourceBatch> {
        if batch.0 < self.ready.len() {
            Some(self.ready.remove(batch.0))
        } else {
            None
        }
    }
}

/// Building-placement mode latch.
///
/// The immediate-action dispatcher sets the latch; the host's placement
/// system reads it, walks the player through positioning, and clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    /// The building type being placed, if placement mode is active.
    pub active: Option<BuildingTypeId>,
}

impl Placement {
    /// Create an idle latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter placement mode for a building type.
    pub fn start(&mut self, building: BuildingTypeId) {
        self.active = Some(building);
    }

    /// Leave placement mode, returning the building type that was active.
    pub fn clear(&mut self) -> Option<BuildingTypeId> {
        self.active.take()
    }
}
