//! Error and warning types shared by `init` and `install`.
//!
//! Everything in [`BootstrapError`] aborts the running command. A
//! [`CleanupWarning`] is collected into the install report and never
//! changes the outcome.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Cannot create target directory: {}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot find october.yaml template: {}", path.display())]
    TemplateMissing { path: PathBuf },

    #[error("{} could not be created", path.display())]
    CopyVerification { path: PathBuf },

    #[error("October is already installed in {}. Use --force to reinstall.", dir.display())]
    InstallationExists { dir: PathBuf },

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Failed to extract {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    #[error("Invalid settings file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BootstrapError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BootstrapError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn extraction(archive: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BootstrapError::Extraction {
            archive: archive.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleanupWarning {
    #[error("Temporary archive could not be removed ({reason}). Delete {} manually", path.display())]
    ArchiveNotRemoved { path: PathBuf, reason: String },

    #[error("{} could not be moved into place: {reason}", path.display())]
    EntryNotMoved { path: PathBuf, reason: String },

    #[error("Install directory could not be removed. Delete {} manually", path.display())]
    FolderNotRemoved { path: PathBuf },
}
