use crate::error::CleanupWarning;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PINNED_VERSION: &str = "v1.0.419";

/// Where a release archive and its ancillary `.htaccess` come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseSource {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default = "default_htaccess_url")]
    pub htaccess_url: String,
}

fn default_version() -> String {
    PINNED_VERSION.to_string()
}

fn default_archive_url() -> String {
    archive_url_for(PINNED_VERSION)
}

fn default_htaccess_url() -> String {
    "https://raw.githubusercontent.com/octobercms/october/master/.htaccess".to_string()
}

pub fn archive_url_for(version: &str) -> String {
    format!(
        "https://github.com/octobercms/october/archive/{}.zip",
        version
    )
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self {
            version: default_version(),
            archive_url: default_archive_url(),
            htaccess_url: default_htaccess_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BootstrapSettings {
    #[serde(default)]
    pub release: ReleaseSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh `october.yaml` was written.
    Created(PathBuf),
    /// An `october.yaml` was already there and was left untouched.
    AlreadyExists(PathBuf),
}

#[derive(Debug)]
pub struct InstallReport {
    pub directory: PathBuf,
    pub version: String,
    pub extracted_folder: String,
    pub warnings: Vec<CleanupWarning>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
