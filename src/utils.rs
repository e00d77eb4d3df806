// ABOUTME: Utility functions for the carousel-slides application
// ABOUTME: Path checks shared by the avatar loader and the file writers

use crate::errors::{CarouselError, Result};
use std::fs;
use std::path::Path;

/// Validate that a path points at an existing file
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(CarouselError::Validation(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Create the parent directory of an output path if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
