//! The validation gate and the enqueue routine.
//!
//! The gate answers "may this task be appended now?" for commands coming
//! from an interactive (human) source; autonomous faction logic performs
//! equivalent checks in its own decision components and calls the enqueue
//! routine directly. Approval mutates shared economic state at enqueue
//! time: population and creation counters for unit tasks, the resource
//! stockpile for every task.
//!
//! All collaborators (ledger, faction registry, selection, HUD) are passed
//! in explicitly; nothing here reaches for globals.

use serde::{Deserialize, Serialize};

use crate::catalog::{TaskKey, TaskKind};
use crate::economy::ResourceLedger;
use crate::factions::{FactionId, FactionRegistry};
use crate::holder::{EntryId, SpawnerId, TaskEvent, TaskHolder};
use crate::math::Fixed;
use crate::notify::{AudioCue, Hud, MessageKind};
use crate::selection::SelectionContext;

/// Where a command originated.
///
/// Only interactive sources are gated through validation and feedback;
/// autonomous sources are expected to have pre-validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandSource {
    /// The human player, via the UI.
    Human,
    /// AI faction logic.
    Autonomous,
}

impl CommandSource {
    /// Check whether this source gets interactive validation and feedback.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Human)
    }
}

/// A queue-directed command.
///
/// Each variant carries its own typed payload; catalogue keys and queue
/// entry ids are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCommand {
    /// Launch a task definition.
    Launch {
        /// The definition to launch.
        task: TaskKey,
        /// AI spawner requesting the task, if any.
        spawner: Option<SpawnerId>,
    },
    /// Launch the definition's upgrade at its current level.
    LaunchUpgrade {
        /// The definition whose upgrade to launch.
        task: TaskKey,
    },
    /// Cancel a pending queue entry. Bypasses validation entirely.
    CancelPending {
        /// The entry to cancel.
        entry: EntryId,
    },
}

/// Why a task command was not applied.
///
/// The first five variants are policy rejections the player can correct;
/// the rest are structural (stale key, unregistered faction) and indicate
/// a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    /// Holder health is below the configured minimum.
    HealthTooLow,
    /// The holder's queue is at its maximum length.
    QueueFull,
    /// The faction cannot afford the task's cost list.
    InsufficientResources,
    /// The faction's population is at its cap.
    PopulationCapReached,
    /// The unit type has hit its creation limit.
    CreationLimitReached,
    /// The task key does not resolve in the holder's catalogue.
    UnknownTask(TaskKey),
    /// The definition has no upgrade step at its current level.
    NoUpgradeAvailable(TaskKey),
    /// The queue entry id does not resolve.
    UnknownEntry(EntryId),
    /// The holder's faction is not registered.
    UnknownFaction(FactionId),
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HealthTooLow => write!(f, "Health is too low to launch tasks"),
            Self::QueueFull => write!(f, "Maximum queued tasks reached"),
            Self::InsufficientResources => write!(f, "Not enough resources to launch this task"),
            Self::PopulationCapReached => write!(f, "Maximum population reached"),
            Self::CreationLimitReached => write!(f, "This unit has reached its creation limit"),
            Self::UnknownTask(task) => write!(f, "Unknown task: {task}"),
            Self::NoUpgradeAvailable(task) => write!(f, "No further upgrade available for {task}"),
            Self::UnknownEntry(entry) => write!(f, "Unknown pending task: {entry}"),
            Self::UnknownFaction(faction) => write!(f, "Unknown faction: {faction}"),
        }
    }
}

impl std::error::Error for LaunchError {}

/// The pure validation gate.
///
/// Checks run in fixed order and short-circuit on the first failure:
/// holder health, queue capacity, affordability (the upgrade step's cost
/// list at the current level for upgrade launches, the base cost list
/// otherwise), then population room and the per-type creation limit for
/// unit-creation launches. No side effects.
pub fn check_launch(
    holder: &TaskHolder,
    task: TaskKey,
    upgrade: bool,
    ledger: &ResourceLedger,
    factions: &FactionRegistry,
) -> Result<(), LaunchError> {
    if holder.health.current < holder.min_task_health {
        return Err(LaunchError::HealthTooLow);
    }
    if holder.queue_is_full() {
        return Err(LaunchError::QueueFull);
    }

    let spec = holder
        .catalog
        .get(task)
        .ok_or(LaunchError::UnknownTask(task))?;

    if upgrade {
        let step = spec
            .current_upgrade()
            .ok_or(LaunchError::NoUpgradeAvailable(task))?;
        if !ledger.affordable(holder.faction, &step.costs, Fixed::ONE) {
            return Err(LaunchError::InsufficientResources);
        }
    } else {
        if !ledger.affordable(holder.faction, &spec.costs, Fixed::ONE) {
            return Err(LaunchError::InsufficientResources);
        }

        if spec.kind == TaskKind::CreateUnit {
            let faction = factions
                .get(holder.faction)
                .map_err(|_| LaunchError::UnknownFaction(holder.faction))?;
            if !faction.population.has_room() {
                return Err(LaunchError::PopulationCapReached);
            }
            if let Some(unit) = spec.unit_creation.as_ref().and_then(|c| c.representative()) {
                if faction.caps.unit_limit_reached(unit) {
                    return Err(LaunchError::CreationLimitReached);
                }
            }
        }
    }

    Ok(())
}

/// The interactive validation gate.
///
/// Runs [`check_launch`]; on rejection, shows the player-facing message and
/// plays the declined cue before reporting the rejection. No side effects
/// on approval.
pub fn validate_launch(
    holder: &TaskHolder,
    task: TaskKey,
    upgrade: bool,
    ledger: &ResourceLedger,
    factions: &FactionRegistry,
    hud: &mut dyn Hud,
) -> Result<(), LaunchError> {
    check_launch(holder, task, upgrade, ledger, factions).map_err(|rejection| {
        hud.show_message(&rejection.to_string(), MessageKind::Error);
        hud.play_audio(AudioCue::TaskDeclined);
        rejection
    })
}

/// Apply a queue-directed command to a holder.
///
/// `CancelPending` removes exactly the named entry for any holder state and
/// any source, mutating neither resources nor population: the optimistic
/// population reservation made at enqueue is deliberately not released (see
/// DESIGN.md).
///
/// `Launch`/`LaunchUpgrade` from an interactive source re-run the
/// validation gate (feedback included); autonomous sources skip it. On
/// approval the routine reserves population and the creation counter for
/// unit tasks, appends the queue entry (starting the countdown if the queue
/// was idle), debits the matching cost list, fires the launch events,
/// marks research/upgrade definitions active, refreshes the relevant HUD
/// panels, and consumes one-shot definitions.
pub fn apply_task_command(
    holder: &mut TaskHolder,
    command: TaskCommand,
    source: CommandSource,
    ledger: &mut ResourceLedger,
    factions: &mut FactionRegistry,
    selection: &SelectionContext,
    hud: &mut dyn Hud,
) -> Result<Vec<TaskEvent>, LaunchError> {
    let (task, spawner, upgrade) = match command {
        TaskCommand::CancelPending { entry } => {
            let removed = holder
                .cancel_entry(entry)
                .map_err(|_| LaunchError::UnknownEntry(entry))?;
            tracing::debug!(holder = holder.id, entry = %removed.id, "pending task cancelled");
            return Ok(vec![TaskEvent::TaskCancelled {
                holder: holder.id,
                entry: removed.id,
                task: removed.task,
            }]);
        }
        TaskCommand::Launch { task, spawner } => (task, spawner, false),
        TaskCommand::LaunchUpgrade { task } => (task, None, true),
    };

    if source.is_interactive() {
        validate_launch(holder, task, upgrade, ledger, factions, hud)?;
    }

    let spec = holder
        .catalog
        .get(task)
        .ok_or(LaunchError::UnknownTask(task))?;
    let kind = spec.kind;
    let one_shot = spec.one_shot;
    let launch_hook = spec.launch_hook;
    let unit_type = spec.unit_creation.as_ref().and_then(|c| c.representative());
    let (costs, duration) = if upgrade {
        let step = spec
            .current_upgrade()
            .ok_or(LaunchError::NoUpgradeAvailable(task))?;
        (step.costs.clone(), step.duration)
    } else {
        (spec.costs.clone(), spec.reload)
    };

    if kind == TaskKind::CreateUnit && !upgrade {
        let faction = factions
            .get_mut(holder.faction)
            .map_err(|_| LaunchError::UnknownFaction(holder.faction))?;
        // Optimistic reservation, consumed when production spawns the unit
        faction.population.reserve();
        if source.is_interactive() {
            hud.update_population_display();
        }
        if let Some(unit) = unit_type {
            faction.caps.record_unit_queued(unit);
        }
    }

    let entry = holder.push_entry(task, kind, spawner, upgrade, duration, unit_type);
    ledger.debit(holder.faction, &costs);

    let mut events = vec![TaskEvent::TaskLaunched {
        holder: holder.id,
        entry,
        task,
    }];
    if let Some(hook) = launch_hook {
        events.push(TaskEvent::LaunchHook { task, hook });
    }

    if source.is_interactive() {
        if upgrade || kind == TaskKind::Research {
            if let Some(spec) = holder.catalog.get_mut(task) {
                spec.active = true;
            }
            holder.catalog.refresh_unlocks();
        }

        if selection.is_holder_selected(holder.id) {
            hud.refresh_in_progress_panel();
            hud.refresh_task_panel();
        }
        hud.play_audio(AudioCue::TaskLaunched);
    }

    if one_shot {
        holder.catalog.remove(task);
        hud.refresh_task_panel();
    }

    tracing::debug!(
        holder = holder.id,
        task = %task,
        entry = %entry,
        upgrade,
        "task launched"
    );

    Ok(events)
}
