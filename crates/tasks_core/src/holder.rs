//! Task holders and their FIFO queues.
//!
//! A task holder is a building or unit that owns a catalogue of launchable
//! definitions, a first-in-first-out queue of in-flight entries, and a
//! single countdown timer. The timer runs iff the queue is non-empty;
//! exactly one entry (the head) is in progress at a time.
//!
//! Queue entries snapshot the duration and chosen unit type at enqueue
//! time, so completion stays valid even when a one-shot definition has
//! since been removed from the catalogue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::catalog::{HookId, TaskCatalog, TaskKey, TaskKind, UnitTypeId};
use crate::error::{Result, TaskError};
use crate::factions::FactionId;
use crate::EntityId;

/// Stable key for an in-flight queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u32);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entry#{}", self.0)
    }
}

/// Identifier of the AI spawner that requested a task.
///
/// Autonomous faction logic tags its requests so completed units route back
/// to the right spawn point; player-issued tasks carry no spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnerId(pub u32);

/// Current/maximum health of a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: u32,
    /// Maximum health points.
    pub max: u32,
}

impl Health {
    /// Create a health component at full health.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage with saturating subtraction.
    pub fn apply_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Check if the holder is destroyed.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// An in-flight instance of a task definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Stable entry id, unique within the holder.
    pub id: EntryId,
    /// The definition this entry was launched from.
    pub task: TaskKey,
    /// Kind snapshot taken at enqueue.
    pub kind: TaskKind,
    /// AI spawner that requested the task, if any.
    pub spawner: Option<SpawnerId>,
    /// Whether this entry is an upgrade launch.
    pub upgrade: bool,
    /// Duration snapshot taken at enqueue, in ticks.
    pub duration: u32,
    /// Chosen unit type for creation entries.
    pub unit_type: Option<UnitTypeId>,
}

/// Events emitted by the task queue lifecycle.
///
/// Fire-and-forget: routines return these for the host to route to
/// whatever observers care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEvent {
    /// A task entry was appended to a holder's queue.
    TaskLaunched {
        /// The holder that accepted the task.
        holder: EntityId,
        /// The new queue entry.
        entry: EntryId,
        /// The launched definition.
        task: TaskKey,
    },
    /// The launched definition carries a host hook.
    LaunchHook {
        /// The launched definition.
        task: TaskKey,
        /// The host-defined hook to fire.
        hook: HookId,
    },
    /// The queue head finished its countdown.
    TaskCompleted {
        /// The holder whose entry completed.
        holder: EntityId,
        /// The completed entry.
        entry: EntryId,
        /// The definition the entry was launched from.
        task: TaskKey,
        /// Kind snapshot from the entry.
        kind: TaskKind,
        /// AI spawner that requested the task, if any.
        spawner: Option<SpawnerId>,
        /// Unit type to spawn for creation entries.
        unit_type: Option<UnitTypeId>,
    },
    /// An upgrade entry completed and its replacement was applied.
    TaskUpgraded {
        /// The holder whose definition upgraded.
        holder: EntityId,
        /// The upgraded definition.
        task: TaskKey,
        /// The definition's new upgrade level.
        level: usize,
    },
    /// A pending entry was cancelled.
    TaskCancelled {
        /// The holder whose entry was cancelled.
        holder: EntityId,
        /// The cancelled entry.
        entry: EntryId,
        /// The definition the entry was launched from.
        task: TaskKey,
    },
}

/// A building or unit that owns a task queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHolder {
    /// Entity id of the holder.
    pub id: EntityId,
    /// Owning faction.
    pub faction: FactionId,
    /// Holder health.
    pub health: Health,
    /// Minimum health required to launch tasks.
    pub min_task_health: u32,
    /// Maximum queue length.
    pub max_queue: usize,
    /// The holder's task catalogue.
    pub catalog: TaskCatalog,
    queue: VecDeque<QueueEntry>,
    countdown: u32,
    next_entry: u32,
}

impl TaskHolder {
    /// Default maximum queue length.
    pub const DEFAULT_MAX_QUEUE: usize = 5;

    /// Create a holder with the given catalogue.
    #[must_use]
    pub fn new(id: EntityId, faction: FactionId, catalog: TaskCatalog) -> Self {
        Self {
            id,
            faction,
            health: Health::new(100),
            min_task_health: 0,
            max_queue: Self::DEFAULT_MAX_QUEUE,
            catalog,
            queue: VecDeque::new(),
            countdown: 0,
            next_entry: 0,
        }
    }

    /// Set the holder's health pool.
    #[must_use]
    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }

    /// Set the minimum health required to launch tasks.
    #[must_use]
    pub fn with_min_task_health(mut self, min: u32) -> Self {
        self.min_task_health = min;
        self
    }

    /// Set the maximum queue length.
    #[must_use]
    pub fn with_max_queue(mut self, max: usize) -> Self {
        self.max_queue = max;
        self
    }

    /// Number of queued entries.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Check whether the queue is empty.
    #[must_use]
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Check whether the queue is at its maximum length.
    #[must_use]
    pub fn queue_is_full(&self) -> bool {
        self.queue.len() >= self.max_queue
    }

    /// Remaining ticks for the in-progress entry (0 when idle).
    #[must_use]
    pub const fn countdown(&self) -> u32 {
        self.countdown
    }

    /// The in-progress entry.
    #[must_use]
    pub fn head(&self) -> Option<&QueueEntry> {
        self.queue.front()
    }

    /// Iterate queued entries in FIFO order.
    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.queue.iter()
    }

    /// Look up a queued entry by id.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&QueueEntry> {
        self.queue.iter().find(|e| e.id == id)
    }

    /// Append an entry, starting the timer if the queue was idle.
    ///
    /// Validation, charging and event emission are the launcher's job; this
    /// is the queue mechanism only.
    pub(crate) fn push_entry(
        &mut self,
        task: TaskKey,
        kind: TaskKind,
        spawner: Option<SpawnerId>,
        upgrade: bool,
        duration: u32,
        unit_type: Option<UnitTypeId>,
    ) -> EntryId {
        let id = EntryId(self.next_entry);
        self.next_entry += 1;
        // Zero-length tasks complete on the next tick
        let duration = duration.max(1);
        let was_idle = self.queue.is_empty();
        self.queue.push_back(QueueEntry {
            id,
            task,
            kind,
            spawner,
            upgrade,
            duration,
            unit_type,
        });
        if was_idle {
            self.countdown = duration;
        }
        self.check_invariant();
        id
    }

    /// Remove a queued entry by id.
    ///
    /// Bypasses all validation; the timer restarts with the next entry's
    /// snapshot duration if the head was removed. No resources or
    /// population are released.
    pub fn cancel_entry(&mut self, id: EntryId) -> Result<QueueEntry> {
        let index = self
            .queue
            .iter()
            .position(|e| e.id == id)
            .ok_or(TaskError::UnknownEntry(id))?;
        let entry = self
            .queue
            .remove(index)
            .ok_or(TaskError::UnknownEntry(id))?;
        if index == 0 {
            self.countdown = self.queue.front().map_or(0, |next| next.duration);
        }
        self.check_invariant();
        Ok(entry)
    }

    /// Advance the countdown by one tick.
    ///
    /// When the countdown reaches zero the head entry completes: a
    /// [`TaskEvent::TaskCompleted`] is emitted, upgrade entries apply their
    /// replacement to the base definition, and the timer restarts with the
    /// next entry's snapshot duration (or stops if the queue emptied).
    pub fn tick(&mut self) -> Vec<TaskEvent> {
        if self.queue.is_empty() {
            return Vec::new();
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(entry) = self.queue.pop_front() {
            events.push(TaskEvent::TaskCompleted {
                holder: self.id,
                entry: entry.id,
                task: entry.task,
                kind: entry.kind,
                spawner: entry.spawner,
                unit_type: entry.unit_type,
            });

            if entry.upgrade {
                if let Some(spec) = self.catalog.get_mut(entry.task) {
                    if spec.apply_upgrade() {
                        events.push(TaskEvent::TaskUpgraded {
                            holder: self.id,
                            task: entry.task,
                            level: spec.upgrade_level,
                        });
                    }
                }
            }
        }

        self.countdown = self.queue.front().map_or(0, |next| next.duration);
        self.check_invariant();
        events
    }

    fn check_invariant(&self) {
        #[cfg(feature = "debug-validation")]
        assert_eq!(
            self.queue.is_empty(),
            self.countdown == 0,
            "holder {}: timer must run iff queue is non-empty",
            self.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TaskCatalog, TaskSpec, UnitCreationSpec, UpgradeSpec};
    use crate::economy::{ResourceCost, ResourceId};

    fn cost(amount: i32) -> Vec<ResourceCost> {
        vec![ResourceCost::new(ResourceId::new(0), amount)]
    }

    fn holder_with_task(reload: u32) -> (TaskHolder, TaskKey) {
        let mut catalog = TaskCatalog::new();
        let key = catalog.add(TaskSpec::new("train", TaskKind::CreateUnit, cost(10), reload));
        (TaskHolder::new(1, FactionId::new(0), catalog), key)
    }

    #[test]
    fn test_push_starts_timer_only_when_idle() {
        let (mut holder, key) = holder_with_task(40);

        assert_eq!(holder.countdown(), 0);
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 40, None);
        assert_eq!(holder.countdown(), 40);

        // Second push does not restart the running timer
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 40, None);
        assert_eq!(holder.countdown(), 40);
        assert_eq!(holder.queue_len(), 2);
    }

    #[test]
    fn test_tick_completes_head_and_restarts() {
        let (mut holder, key) = holder_with_task(2);
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 2, Some(UnitTypeId::new(1)));
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 3, None);

        assert!(holder.tick().is_empty());
        let events = holder.tick();
        assert!(events.iter().any(|e| matches!(
            e,
            TaskEvent::TaskCompleted {
                holder: 1,
                unit_type: Some(UnitTypeId(1)),
                ..
            }
        )));

        // Timer restarted with the next entry's snapshot
        assert_eq!(holder.queue_len(), 1);
        assert_eq!(holder.countdown(), 3);
    }

    #[test]
    fn test_timer_stops_when_queue_empties() {
        let (mut holder, key) = holder_with_task(1);
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 1, None);

        let events = holder.tick();
        assert_eq!(events.len(), 1);
        assert!(holder.queue_is_empty());
        assert_eq!(holder.countdown(), 0);
        assert!(holder.tick().is_empty());
    }

    #[test]
    fn test_cancel_head_restarts_timer() {
        let (mut holder, key) = holder_with_task(10);
        let first = holder.push_entry(key, TaskKind::CreateUnit, None, false, 10, None);
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 7, None);

        holder.cancel_entry(first).unwrap();
        assert_eq!(holder.queue_len(), 1);
        assert_eq!(holder.countdown(), 7);
    }

    #[test]
    fn test_cancel_middle_leaves_timer() {
        let (mut holder, key) = holder_with_task(10);
        holder.push_entry(key, TaskKind::CreateUnit, None, false, 10, None);
        let second = holder.push_entry(key, TaskKind::CreateUnit, None, false, 7, None);

        holder.cancel_entry(second).unwrap();
        assert_eq!(holder.countdown(), 10);
        assert!(holder.entry(second).is_none());
    }

    #[test]
    fn test_cancel_last_entry_stops_timer() {
        let (mut holder, key) = holder_with_task(10);
        let only = holder.push_entry(key, TaskKind::CreateUnit, None, false, 10, None);

        holder.cancel_entry(only).unwrap();
        assert!(holder.queue_is_empty());
        assert_eq!(holder.countdown(), 0);
    }

    #[test]
    fn test_cancel_unknown_entry() {
        let (mut holder, _) = holder_with_task(10);
        assert!(matches!(
            holder.cancel_entry(EntryId(9)),
            Err(TaskError::UnknownEntry(EntryId(9)))
        ));
    }

    #[test]
    fn test_upgrade_completion_applies_replacement() {
        let mut catalog = TaskCatalog::new();
        let upgrade = UpgradeSpec::new("mk2", cost(25), 2).with_replacement(cost(5), 20);
        let key = catalog.add(
            TaskSpec::new("train", TaskKind::CreateUnit, cost(10), 40).with_unit_creation(
                UnitCreationSpec::new(vec![UnitTypeId::new(1)]).with_upgrades(vec![upgrade]),
            ),
        );
        let mut holder = TaskHolder::new(1, FactionId::new(0), catalog);
        holder.push_entry(key, TaskKind::CreateUnit, None, true, 2, None);

        holder.tick();
        let events = holder.tick();
        assert!(events
            .iter()
            .any(|e| matches!(e, TaskEvent::TaskUpgraded { level: 1, .. })));

        let spec = holder.catalog.get(key).unwrap();
        assert_eq!(spec.costs, cost(5));
        assert_eq!(spec.reload, 20);
    }

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(50);
        health.apply_damage(20);
        assert_eq!(health.current, 30);
        health.apply_damage(100);
        assert!(health.is_dead());
    }
}
