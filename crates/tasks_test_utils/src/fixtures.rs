//! Pre-built catalogues, holders and faction states for consistent testing.

use fixed::types::I32F32;

use tasks_core::catalog::{TaskCatalog, TaskKey, TaskKind, TaskSpec, UnitCreationSpec, UnitTypeId};
use tasks_core::economy::{ResourceCost, ResourceId, ResourceLedger};
use tasks_core::factions::{FactionId, FactionRegistry, FactionState};
use tasks_core::holder::{Health, TaskHolder};
use tasks_core::selection::SelectionContext;

/// The human-controlled faction used by fixtures.
pub const PLAYER: FactionId = FactionId(0);

/// The fixture resource.
pub const WOOD: ResourceId = ResourceId(0);

/// The unit type the fixture barracks trains.
pub const SCOUT: UnitTypeId = UnitTypeId(1);

/// Entity id of the fixture barracks.
pub const BARRACKS: u64 = 7;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// A one-line cost list in the fixture resource.
#[must_use]
pub fn wood(amount: i32) -> Vec<ResourceCost> {
    vec![ResourceCost::new(WOOD, amount)]
}

/// A small world around one barracks-style task holder.
#[derive(Debug)]
pub struct TestWorld {
    /// The task holder under test.
    pub holder: TaskHolder,
    /// Key of the unit-creation task (cost 10 wood, reload 40).
    pub train: TaskKey,
    /// Key of the research task (cost 25 wood, reload 60).
    pub optics: TaskKey,
    /// Per-faction stockpiles; the player starts with 100 wood.
    pub ledger: ResourceLedger,
    /// Faction registry; the player has population cap 10.
    pub factions: FactionRegistry,
    /// Empty selection.
    pub selection: SelectionContext,
}

/// Build the standard test world.
///
/// One registered faction, one holder with a unit-creation task and a
/// research task, max queue 3, min task health 20, full health 100.
#[must_use]
pub fn world() -> TestWorld {
    let mut catalog = TaskCatalog::new();
    let train = catalog.add(
        TaskSpec::new("train scout", TaskKind::CreateUnit, wood(10), 40)
            .with_unit_creation(UnitCreationSpec::new(vec![SCOUT])),
    );
    let optics = catalog.add(TaskSpec::new("field optics", TaskKind::Research, wood(25), 60));

    let holder = TaskHolder::new(BARRACKS, PLAYER, catalog)
        .with_health(Health::new(100))
        .with_min_task_health(20)
        .with_max_queue(3);

    let mut ledger = ResourceLedger::new();
    ledger.stockpile_mut(PLAYER).set(WOOD, 100);

    let mut factions = FactionRegistry::new();
    factions.register(PLAYER, FactionState::new(10));

    TestWorld {
        holder,
        train,
        optics,
        ledger,
        factions,
        selection: SelectionContext::new(),
    }
}
