//! Task catalogues and task definitions.
//!
//! Every task holder owns a catalogue of launchable task definitions. A
//! definition describes one action: its kind, cost list, reload duration,
//! and optional unit-creation or research payloads.
//!
//! Definitions are addressed by generated [`TaskKey`]s resolved through a
//! key map, never by list position, so removing a one-shot definition does
//! not shift or invalidate anything another part of the game still holds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::economy::ResourceCost;
use crate::math::{fixed_serde, Fixed};

/// Stable key for a task definition within a holder's catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey(pub u32);

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Unique identifier for unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitTypeId(pub u32);

impl UnitTypeId {
    /// Create a new unit type id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for building types.
///
/// A distinct type from [`UnitTypeId`]; the two index spaces are never
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingTypeId(pub u32);

impl BuildingTypeId {
    /// Create a new building type id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Handle to an icon asset in the host's UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconId(pub u16);

/// Handle to a host-defined launch hook.
///
/// Hooks are opaque to the core; launching a task whose definition carries
/// one emits a `LaunchHook` event for the host to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HookId(pub u16);

/// What a task definition does when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Produce a unit from the definition's creation payload.
    CreateUnit,
    /// Research a faction-wide improvement.
    Research,
    /// Targeted move order (resolved by a later input event).
    Move,
    /// Targeted attack order.
    Attack,
    /// Targeted build/repair order.
    Build,
    /// Targeted heal order.
    Heal,
    /// Targeted convert order.
    Convert,
    /// Targeted resource-collection order.
    Collect,
    /// Targeted destroy order.
    Destroy,
    /// Host-defined task.
    Custom,
}

impl TaskKind {
    /// Check whether this kind is resolved by a later targeted input.
    #[must_use]
    pub const fn is_targeted(self) -> bool {
        matches!(
            self,
            Self::Move | Self::Attack | Self::Build | Self::Heal
                | Self::Convert | Self::Collect | Self::Destroy
        )
    }
}

/// One step of a definition's upgrade ladder.
///
/// The upgrade itself is launched like a task (own cost and duration); when
/// it completes, the replacement fields below are applied to the base
/// definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    /// Short description shown for the upgrade entry.
    pub description: String,
    /// Icon for the upgrade entry.
    pub icon: Option<IconId>,
    /// Resource cost to launch the upgrade.
    pub costs: Vec<ResourceCost>,
    /// Ticks until the upgrade takes effect.
    pub duration: u32,
    /// Replacement icon for the base definition.
    pub new_icon: Option<IconId>,
    /// Replacement description for the base definition.
    pub new_description: Option<String>,
    /// Replacement cost list for the base definition (empty = unchanged).
    pub new_costs: Vec<ResourceCost>,
    /// Replacement reload duration for the base definition.
    pub new_reload: u32,
}

impl UpgradeSpec {
    /// Create an upgrade step.
    #[must_use]
    pub fn new(description: impl Into<String>, costs: Vec<ResourceCost>, duration: u32) -> Self {
        Self {
            description: description.into(),
            icon: None,
            costs,
            duration,
            new_icon: None,
            new_description: None,
            new_costs: Vec::new(),
            new_reload: 0,
        }
    }

    /// Set the replacement applied to the base definition on completion.
    #[must_use]
    pub fn with_replacement(mut self, new_costs: Vec<ResourceCost>, new_reload: u32) -> Self {
        self.new_costs = new_costs;
        self.new_reload = new_reload;
        self
    }
}

/// Stat bonuses granted when a research task completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSpec {
    /// Movement speed bonus.
    #[serde(with = "fixed_serde")]
    pub speed_bonus: Fixed,
    /// Bonus damage vs units.
    #[serde(with = "fixed_serde")]
    pub unit_damage_bonus: Fixed,
    /// Bonus damage vs buildings.
    #[serde(with = "fixed_serde")]
    pub building_damage_bonus: Fixed,
    /// Attack reload delta (negative = faster).
    #[serde(with = "fixed_serde")]
    pub attack_reload_delta: Fixed,
    /// Search range bonus.
    #[serde(with = "fixed_serde")]
    pub search_range_bonus: Fixed,
    /// Max health bonus.
    pub max_health_bonus: i32,
    /// Unit types the bonuses apply to.
    pub affects: Vec<UnitTypeId>,
}

impl Default for ResearchSpec {
    fn default() -> Self {
        Self {
            speed_bonus: Fixed::ZERO,
            unit_damage_bonus: Fixed::ZERO,
            building_damage_bonus: Fixed::ZERO,
            attack_reload_delta: Fixed::ZERO,
            search_range_bonus: Fixed::ZERO,
            max_health_bonus: 0,
            affects: Vec::new(),
        }
    }
}

/// Unit-creation payload of a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitCreationSpec {
    /// Candidate unit types; production picks from these.
    pub candidates: Vec<UnitTypeId>,
    /// Ordered upgrade ladder for this definition.
    pub upgrades: Vec<UpgradeSpec>,
}

impl UnitCreationSpec {
    /// Create a payload with the given candidates.
    #[must_use]
    pub fn new(candidates: Vec<UnitTypeId>) -> Self {
        Self {
            candidates,
            upgrades: Vec::new(),
        }
    }

    /// Add an upgrade ladder.
    #[must_use]
    pub fn with_upgrades(mut self, upgrades: Vec<UpgradeSpec>) -> Self {
        self.upgrades = upgrades;
        self
    }

    /// The deterministic representative candidate.
    ///
    /// Used for creation-limit accounting and the enqueue snapshot.
    #[must_use]
    pub fn representative(&self) -> Option<UnitTypeId> {
        self.candidates.first().copied()
    }
}

/// A launchable task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Display name.
    pub name: String,
    /// Description shown in the task panel.
    pub description: String,
    /// Panel icon.
    pub icon: Option<IconId>,
    /// What the task does.
    pub kind: TaskKind,
    /// Resource cost to launch.
    pub costs: Vec<ResourceCost>,
    /// Ticks from launch to completion.
    pub reload: u32,
    /// Remove the definition from the catalogue after its first launch.
    pub one_shot: bool,
    /// Unit-creation payload (for [`TaskKind::CreateUnit`]).
    pub unit_creation: Option<UnitCreationSpec>,
    /// Research payload (for [`TaskKind::Research`]).
    pub research: Option<ResearchSpec>,
    /// Definitions that must be active before this one unlocks.
    pub requires: Vec<TaskKey>,
    /// Host hook fired when the task launches.
    pub launch_hook: Option<HookId>,
    /// Whether the task has been launched (research/upgrade bookkeeping).
    pub active: bool,
    /// Whether all prerequisites are satisfied.
    pub unlocked: bool,
    /// How many upgrade steps have been applied.
    pub upgrade_level: usize,
}

impl TaskSpec {
    /// Create a task definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TaskKind, costs: Vec<ResourceCost>, reload: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon: None,
            kind,
            costs,
            reload,
            one_shot: false,
            unit_creation: None,
            research: None,
            requires: Vec::new(),
            launch_hook: None,
            active: false,
            unlocked: true,
            upgrade_level: 0,
        }
    }

    /// Set the unit-creation payload.
    #[must_use]
    pub fn with_unit_creation(mut self, creation: UnitCreationSpec) -> Self {
        self.unit_creation = Some(creation);
        self
    }

    /// Set the research payload.
    #[must_use]
    pub fn with_research(mut self, research: ResearchSpec) -> Self {
        self.research = Some(research);
        self
    }

    /// Mark the definition one-shot.
    #[must_use]
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    /// Set prerequisite definitions.
    #[must_use]
    pub fn with_requires(mut self, requires: Vec<TaskKey>) -> Self {
        self.unlocked = requires.is_empty();
        self.requires = requires;
        self
    }

    /// Set the launch hook.
    #[must_use]
    pub fn with_launch_hook(mut self, hook: HookId) -> Self {
        self.launch_hook = Some(hook);
        self
    }

    /// The upgrade step at the current level, if the ladder has one.
    #[must_use]
    pub fn current_upgrade(&self) -> Option<&UpgradeSpec> {
        self.unit_creation
            .as_ref()
            .and_then(|c| c.upgrades.get(self.upgrade_level))
    }

    /// Apply the current upgrade step's replacement to this definition.
    ///
    /// Returns `false` if the ladder has no step at the current level.
    pub fn apply_upgrade(&mut self) -> bool {
        let Some(upgrade) = self.current_upgrade().cloned() else {
            return false;
        };
        if let Some(icon) = upgrade.new_icon {
            self.icon = Some(icon);
        }
        if let Some(description) = upgrade.new_description {
            self.description = description;
        }
        if !upgrade.new_costs.is_empty() {
            self.costs = upgrade.new_costs;
        }
        if upgrade.new_reload > 0 {
            self.reload = upgrade.new_reload;
        }
        self.upgrade_level += 1;
        self.active = false;
        true
    }
}

/// A holder's catalogue of task definitions.
///
/// Keys are generated once and never reused; the panel ordering is kept in
/// a separate key list so removal shrinks the listing without renumbering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskCatalog {
    specs: HashMap<TaskKey, TaskSpec>,
    order: Vec<TaskKey>,
    next_key: u32,
}

impl TaskCatalog {
    /// Create an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, returning its generated key.
    pub fn add(&mut self, spec: TaskSpec) -> TaskKey {
        let key = TaskKey(self.next_key);
        self.next_key += 1;
        self.specs.insert(key, spec);
        self.order.push(key);
        key
    }

    /// Remove a definition (one-shot consumption).
    ///
    /// The key stops resolving; every other key is untouched.
    pub fn remove(&mut self, key: TaskKey) -> Option<TaskSpec> {
        let spec = self.specs.remove(&key)?;
        self.order.retain(|k| *k != key);
        Some(spec)
    }

    /// Resolve a key.
    #[must_use]
    pub fn get(&self, key: TaskKey) -> Option<&TaskSpec> {
        self.specs.get(&key)
    }

    /// Resolve a key mutably.
    pub fn get_mut(&mut self, key: TaskKey) -> Option<&mut TaskSpec> {
        self.specs.get_mut(&key)
    }

    /// Check whether a key resolves.
    #[must_use]
    pub fn contains(&self, key: TaskKey) -> bool {
        self.specs.contains_key(&key)
    }

    /// Panel-ordered keys.
    pub fn keys(&self) -> impl Iterator<Item = TaskKey> + '_ {
        self.order.iter().copied()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Re-evaluate every definition's `unlocked` flag.
    ///
    /// A definition unlocks when all of its prerequisites are active.
    /// Prerequisites that no longer resolve (consumed one-shots) are treated
    /// as unsatisfied; data files should not mark prerequisite definitions
    /// one-shot.
    pub fn refresh_unlocks(&mut self) {
        let active: Vec<TaskKey> = self
            .specs
            .iter()
            .filter(|(_, spec)| spec.active)
            .map(|(key, _)| *key)
            .collect();
        for spec in self.specs.values_mut() {
            spec.unlocked = spec.requires.iter().all(|req| active.contains(req));
        }
    }
}
