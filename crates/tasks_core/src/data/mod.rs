//! Data structures for task-catalogue configuration.
//!
//! This module contains pure data structures designed to be deserialized
//! from RON files, plus the builder that resolves them into a runtime
//! [`crate::catalog::TaskCatalog`].
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by the host (or by `tasks_tools` for
//! validation).

mod task_data;

pub use task_data::{
    build_catalog, CatalogData, CostData, ResearchData, TaskData, UnitCreationData, UpgradeData,
};
