//! Task catalogue data validation.
//!
//! Parses every `.ron` catalogue file under a directory and runs the same
//! consistency checks the runtime builder applies: duplicate ids, broken
//! `requires` references, unit-creation tasks without candidates, zero
//! durations and negative costs.

use std::path::Path;

use tasks_core::data::{build_catalog, CatalogData};
use tasks_core::economy::ResourceRegistry;
use tasks_core::error::{Result, TaskError};

/// Validate a single catalogue file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails a
/// consistency check.
pub fn validate_catalog_file(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(|e| TaskError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let data: CatalogData = ron::from_str(&text).map_err(|e| TaskError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut resources = ResourceRegistry::new();
    let catalog = build_catalog(&data, &mut resources)?;
    tracing::info!(
        path = %path.display(),
        tasks = catalog.len(),
        "catalogue ok"
    );
    Ok(())
}

/// Validate all RON catalogue files in a directory, recursively.
///
/// # Errors
///
/// Returns the first error encountered; files are visited in directory
/// order.
pub fn validate_data_directory(path: &Path) -> Result<()> {
    let entries = std::fs::read_dir(path).map_err(|e| TaskError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| TaskError::DataParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            validate_data_directory(&entry_path)?;
        } else if entry_path.extension().is_some_and(|ext| ext == "ron") {
            validate_catalog_file(&entry_path)?;
        }
    }

    Ok(())
}
