//! Atomic write primitive for baselines and reports
//!
//! Uses temp→rename so a crashed run never leaves a half-written baseline.

use crate::errors::{PermCheckError, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Atomically replace `target` with `content`, creating parent directories
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| PermCheckError::io("create_parent_dir", parent, e))?;
    }

    let temp_path = temp_path_for(target);
    fs::write(&temp_path, content).map_err(|e| PermCheckError::io("write_temp", &temp_path, e))?;
    fs::rename(&temp_path, target).map_err(|e| PermCheckError::io("rename_temp", target, e))?;

    Ok(())
}
