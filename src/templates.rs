//! Templates bundled into the binary and staged on disk before use.

use crate::config::PROJECT_CONFIG_FILE;
use crate::error::BootstrapError;
use std::fs;
use std::path::Path;

pub const DEFAULT_PROJECT_CONFIG: &str = include_str!("../templates/october.yaml");

/// File name and contents of every bundled template.
pub const BUNDLED: &[(&str, &str)] = &[(PROJECT_CONFIG_FILE, DEFAULT_PROJECT_CONFIG)];

/// Write the bundled templates into `dir`, replacing stale copies.
pub fn materialize(dir: &Path) -> Result<(), BootstrapError> {
    fs::create_dir_all(dir).map_err(|e| BootstrapError::io(dir, e))?;

    for (name, contents) in BUNDLED {
        let path = dir.join(name);
        let up_to_date = fs::read_to_string(&path)
            .map(|existing| existing == *contents)
            .unwrap_or(false);
        if up_to_date {
            tracing::debug!("Template {} is up to date", path.display());
            continue;
        }

        fs::write(&path, contents).map_err(|e| BootstrapError::io(&path, e))?;
        tracing::debug!("Updated template {}", path.display());
    }

    Ok(())
}
