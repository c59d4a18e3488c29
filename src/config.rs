use crate::error::BootstrapError;
use crate::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "october-bootstrap";
pub const TEMPLATES_DIR_NAME: &str = "templates";
pub const SETTINGS_FILE_NAME: &str = "config.json";

pub const PROJECT_CONFIG_FILE: &str = "october.yaml";
pub const HTACCESS_FILE: &str = ".htaccess";
pub const TEMP_ARCHIVE_PREFIX: &str = "october_";
pub const TEMP_ARCHIVE_SUFFIX: &str = ".zip";

/// Both must exist as directories for October to count as installed.
pub const GUARD_MARKERS: [&str; 2] = ["bootstrap", "modules"];

pub fn get_user_data_dir() -> Result<PathBuf> {
    let path = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
        .join(APP_NAME);
    tracing::debug!("User data directory: {}", path.display());
    Ok(path)
}

pub fn get_settings_file_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join(APP_NAME).join(SETTINGS_FILE_NAME);
    tracing::debug!("Settings file path: {}", path.display());
    Some(path)
}

/// Staging directory for the bundled templates.
pub fn get_templates_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("OCTOBER_TEMPLATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(get_user_data_dir()?.join(TEMPLATES_DIR_NAME))
}

pub fn load_settings() -> Result<BootstrapSettings> {
    let mut settings = match get_settings_file_path() {
        Some(path) if path.exists() => read_settings_file(&path)
            .with_context(|| format!("Could not load settings from {}", path.display()))?,
        _ => BootstrapSettings::default(),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn read_settings_file(path: &Path) -> Result<BootstrapSettings, BootstrapError> {
    let content = fs::read_to_string(path).map_err(|e| BootstrapError::io(path, e))?;
    let mut settings: BootstrapSettings =
        serde_json::from_str(&content).map_err(|e| BootstrapError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    align_archive_url(&mut settings.release);
    Ok(settings)
}

fn apply_env_overrides<F>(settings: &mut BootstrapSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let release = &mut settings.release;

    if let Some(version) = lookup("OCTOBER_RELEASE_VERSION") {
        if release.archive_url == archive_url_for(&release.version) {
            release.archive_url = archive_url_for(&version);
        }
        release.version = version;
    }

    if let Some(url) = lookup("OCTOBER_ARCHIVE_URL") {
        release.archive_url = url;
    }

    if let Some(url) = lookup("OCTOBER_HTACCESS_URL") {
        release.htaccess_url = url;
    }
}

/// A settings file that names a version but no archive URL should fetch that
/// version, not the pinned one.
fn align_archive_url(release: &mut ReleaseSource) {
    if release.archive_url == archive_url_for(PINNED_VERSION) && release.version != PINNED_VERSION
    {
        release.archive_url = archive_url_for(&release.version);
    }
}
