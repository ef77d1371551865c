//! Error types for the task command core.

use thiserror::Error;

use crate::buildings::BatchIndex;
use crate::factions::FactionId;
use crate::holder::EntryId;

/// Result type alias using [`TaskError`].
pub type Result<T> = std::result::Result<T, TaskError>;

/// Top-level error type for structural failures.
///
/// Policy rejections (not enough resources, queue full, ...) are reported
/// as [`crate::launcher::LaunchError`] values with player-facing feedback.
/// `TaskError` covers misuse the caller is expected to rule out by
/// construction: stale keys, missing selection, malformed data files.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The queue entry id does not resolve in the holder's queue.
    #[error("Unknown queue entry: {0}")]
    UnknownEntry(EntryId),

    /// The faction is not registered.
    #[error("Unknown faction: {0}")]
    UnknownFaction(FactionId),

    /// An action required a selected building and none is selected.
    #[error("No building selected")]
    NoBuildingSelected,

    /// An action required at least one selected unit and none is selected.
    #[error("No unit selected")]
    NoUnitSelected,

    /// The selected entity lacks the component the action needs.
    #[error("Selection has no {0} component")]
    MissingComponent(&'static str),

    /// The batch index does not resolve in the generator's ready list.
    #[error("No ready resource batch at {0}")]
    UnknownBatch(BatchIndex),

    /// The attack mode index does not resolve on the selected unit.
    #[error("No attack mode at index {0}")]
    UnknownAttackMode(usize),

    /// A resource name did not resolve during catalogue building.
    #[error("Unknown resource '{0}'")]
    UnknownResource(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Catalogue data failed a consistency check.
    #[error("Invalid task data: {0}")]
    InvalidData(String),
}
