//! # Tasks Core
//!
//! Deterministic task-queueing and command validation core for Bastion RTS.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! The crate decides whether a player- or AI-issued command may be
//! enqueued on a task holder, mutates shared economic state (resources,
//! population) when it is, and drives each holder's single-slot countdown
//! timer. UI, audio, movement and production are external collaborators
//! reached through the [`notify::Hud`] seam and returned events.
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Task definitions and holder catalogues
//! - [`holder`] - Task holders, queues and the countdown timer
//! - [`launcher`] - The validation gate and enqueue routine
//! - [`instant`] - Immediate actions and the awaiting-input latch
//! - [`economy`] / [`factions`] - Shared per-faction economic state
//! - [`data`] - RON-facing catalogue data structures

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buildings;
pub mod catalog;
pub mod data;
pub mod economy;
pub mod error;
pub mod factions;
pub mod holder;
pub mod instant;
pub mod launcher;
pub mod math;
pub mod notify;
pub mod selection;
pub mod units;

/// Unique identifier for entities.
pub type EntityId = u64;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buildings::{BatchIndex, Placement, ResourceBatch, ResourceGenerator};
    pub use crate::catalog::{
        BuildingTypeId, HookId, IconId, ResearchSpec, TaskCatalog, TaskKey, TaskKind, TaskSpec,
        UnitCreationSpec, UnitTypeId, UpgradeSpec,
    };
    pub use crate::economy::{
        ResourceCost, ResourceId, ResourceLedger, ResourceRegistry, Stockpile,
    };
    pub use crate::error::{Result, TaskError};
    pub use crate::factions::{FactionId, FactionRegistry, FactionState, Population, ProductionCaps};
    pub use crate::holder::{EntryId, Health, QueueEntry, SpawnerId, TaskEvent, TaskHolder};
    pub use crate::instant::{dispatch_instant, ActionEvent, InstantAction, PendingCommand};
    pub use crate::launcher::{
        apply_task_command, check_launch, validate_launch, CommandSource, LaunchError, TaskCommand,
    };
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::notify::{AudioCue, Hud, MessageKind, NullHud};
    pub use crate::selection::{SelectedBuilding, SelectedUnit, SelectionContext};
    pub use crate::units::{AttackMode, AttackModes, Invisibility, Transport, Wander};
    pub use crate::EntityId;
}
