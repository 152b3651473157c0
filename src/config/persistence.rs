//! Decorator table persistence
//!
//! This module loads and saves the user's decorator table in the editor's
//! platform-specific configuration directory, falling back to the built-in
//! markdown table whenever the file is missing or unusable.

use crate::config::DecoratorTable;
use crate::decorations::{DecorationTag, DecoratorRegistry};
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "ferrite";

/// Decorator table file name
const DECORATORS_FILE_NAME: &str = "decorators.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the editor.
///
/// - **Windows**: `%APPDATA%\ferrite\`
/// - **macOS**: `~/Library/Application Support/ferrite/`
/// - **Linux**: `~/.config/ferrite/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the decorator table.
pub fn get_decorators_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(DECORATORS_FILE_NAME))
}

/// The temporary file used while saving `path`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DECORATORS_FILE_NAME));
    name.push(".bak");
    path.with_file_name(name)
}

fn save_error(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

/// Load the decorator table from the default location.
///
/// Falls back to [`DecoratorTable::markdown`] if the file is missing, empty
/// or invalid.
pub fn load_decorators() -> DecoratorTable {
    get_decorators_file_path()
        .and_then(|path| load_decorators_from(&path))
        .unwrap_or_warn_default(DecoratorTable::markdown(), "Failed to load decorators")
}

/// Load the decorator table and compile it, skipping broken entries.
///
/// This is what an editor calls once at start-up.
pub fn load_registry() -> DecoratorRegistry<DecorationTag> {
    load_decorators().compile_lenient()
}

/// Load a decorator table from `path`.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML. A
/// missing or empty file yields the built-in markdown table.
///
/// # Errors
///
/// - `Error::ConfigLoad`: the file exists but cannot be read
/// - `Error::ConfigParse`: the file is not a valid table
pub fn load_decorators_from(path: &Path) -> Result<DecoratorTable> {
    if !path.exists() {
        debug!(
            "Decorator file not found at {}, using built-in table",
            path.display()
        );
        return Ok(DecoratorTable::markdown());
    }

    debug!("Loading decorators from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Decorator file is empty, using built-in table");
        return Ok(DecoratorTable::markdown());
    }

    let parsed = if is_json(path) {
        DecoratorTable::from_json(&contents)
    } else {
        DecoratorTable::from_toml(&contents)
    };
    let table = parsed.map_err(|e| {
        warn!(
            "Decorator file at {} is invalid: {}",
            path.display(),
            e
        );
        e
    })?;

    info!(
        "Loaded {} decorators from {}",
        table.decorators.len(),
        path.display()
    );
    Ok(table)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save
// ─────────────────────────────────────────────────────────────────────────────

/// Save the decorator table to the default location.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: config directory cannot be determined
/// - `Error::ConfigSave`: failed to write the file
pub fn save_decorators(table: &DecoratorTable) -> Result<()> {
    save_decorators_to(table, &get_decorators_file_path()?)
}

/// Save the decorator table to `path`, creating parent directories.
///
/// The table is written to a sibling `.bak` file first and then renamed over
/// `path`, so a crash never leaves a half-written table behind.
pub fn save_decorators_to(table: &DecoratorTable, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating config directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| save_error(dir, e))?;
        }
    }

    debug!("Saving decorators to: {}", path.display());

    let contents = if is_json(path) {
        serde_json::to_string_pretty(table).map_err(|e| save_error(path, e))?
    } else {
        table.to_toml().map_err(|e| save_error(path, e))?
    };

    let backup = backup_path(path);
    fs::write(&backup, &contents).map_err(|e| save_error(&backup, e))?;
    fs::rename(&backup, path).map_err(|e| save_error(path, e))?;

    info!("Decorators saved to {}", path.display());
    Ok(())
}

/// Save the decorator table, logging instead of returning errors.
///
/// Returns `true` if the save succeeded.
pub fn save_decorators_silent(table: &DecoratorTable) -> bool {
    match save_decorators(table) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save decorators: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
