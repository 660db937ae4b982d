//! # File I/O Module
//!
//! Stack files and reports on disk:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use laminate_core::file_io::{load_stack, save_stack};
//! use laminate_core::stack::StackFile;
//! use std::path::Path;
//!
//! let stack = StackFile::new("Panel", "Engineer");
//! save_stack(&stack, Path::new("panel.json"))?;
//!
//! let loaded = load_stack(Path::new("panel.json"))?;
//! assert_eq!(loaded.meta.label, "Panel");
//! # Ok::<(), laminate_core::errors::LaminateError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{LaminateError, LaminateResult};
use crate::stack::{StackFile, SCHEMA_VERSION};

/// Temp path next to `path`: `panel.json` -> `panel.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path` through a synced temp file and a rename.
fn write_atomic(path: &Path, contents: &[u8]) -> LaminateResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| LaminateError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents)
        .map_err(|e| LaminateError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| LaminateError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LaminateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Save a stack file with atomic write semantics.
pub fn save_stack(stack: &StackFile, path: &Path) -> LaminateResult<()> {
    let json = serde_json::to_string_pretty(stack).map_err(|e| LaminateError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, json.as_bytes())
}

/// Load a stack file.
///
/// # Returns
///
/// * `Ok(StackFile)` - Successfully loaded
/// * `Err(LaminateError::VersionMismatch)` - File version is incompatible
/// * `Err(LaminateError::SerializationError)` - Invalid JSON
/// * `Err(LaminateError::FileError)` - I/O error
pub fn load_stack(path: &Path) -> LaminateResult<StackFile> {
    let mut file =
        File::open(path).map_err(|e| LaminateError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| LaminateError::file_error("read", path.display().to_string(), e.to_string()))?;

    let stack: StackFile = serde_json::from_str(&contents).map_err(|e| LaminateError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&stack.meta.version)?;

    debug!("loaded stack '{}' ({} plies) from {}", stack.meta.label, stack.plies.len(), path.display());
    Ok(stack)
}

/// Write a rendered text report with atomic write semantics.
pub fn save_report(report: &str, path: &Path) -> LaminateResult<()> {
    write_atomic(path, report.as_bytes())
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> LaminateResult<()> {
    let mismatch = || LaminateError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };
    let (file_parts, current_parts) = match (parse(file_version), parse(SCHEMA_VERSION)) {
        (Some(f), Some(c)) if !f.is_empty() && !c.is_empty() => (f, c),
        _ => return Err(mismatch()),
    };

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
