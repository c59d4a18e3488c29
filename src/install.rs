//! Downloads a pinned October release and lays it out in a project directory.
//!
//! The pipeline runs guard, fetch archive, extract, fetch `.htaccess`, clean
//! up. Every step up to the `.htaccess` fetch aborts the install on error.
//! Clean-up never does: its failures become [`CleanupWarning`]s on the report.

use crate::config::{GUARD_MARKERS, HTACCESS_FILE, TEMP_ARCHIVE_PREFIX, TEMP_ARCHIVE_SUFFIX};
use crate::download::{extract_zip, Transport};
use crate::error::{BootstrapError, CleanupWarning};
use crate::init::create_working_directory;
use crate::types::{InstallReport, ReleaseSource};
use std::fs;
use std::path::{Path, PathBuf};

pub struct ReleaseInstaller<T: Transport> {
    transport: T,
    source: ReleaseSource,
}

impl<T: Transport> ReleaseInstaller<T> {
    pub fn new(transport: T, source: ReleaseSource) -> Self {
        Self { transport, source }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn install(&self, dir: &Path, force: bool) -> Result<InstallReport, BootstrapError> {
        if is_installed(dir) {
            if !force {
                return Err(BootstrapError::InstallationExists {
                    dir: dir.to_path_buf(),
                });
            }
            tracing::info!("Reinstalling October over {}", dir.display());
        }

        create_working_directory(dir)?;
        let archive = TempArchive::create(dir)?;

        let folder = match self.fetch_and_extract(&archive, dir).await {
            Ok(folder) => folder,
            Err(e) => {
                if let Some(warning) = archive.discard() {
                    tracing::warn!("{}", warning);
                }
                return Err(e);
            }
        };

        let mut warnings = Vec::new();
        warnings.extend(archive.discard());
        warnings.extend(merge_extracted_folder(dir, &folder));

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        Ok(InstallReport {
            directory: dir.to_path_buf(),
            version: self.source.version.clone(),
            extracted_folder: folder,
            warnings,
        })
    }

    async fn fetch_and_extract(
        &self,
        archive: &TempArchive,
        dir: &Path,
    ) -> Result<String, BootstrapError> {
        self.transport
            .fetch(&self.source.archive_url, &archive.path)
            .await?;

        let folder = extract_zip(&archive.path, dir)?;

        // The archive's .htaccess is not trusted to survive extraction
        self.transport
            .fetch(&self.source.htaccess_url, &dir.join(HTACCESS_FILE))
            .await?;

        Ok(folder)
    }
}

pub fn is_installed(dir: &Path) -> bool {
    GUARD_MARKERS.iter().all(|marker| dir.join(marker).is_dir())
}

/// Randomly named download target inside the project directory.
struct TempArchive {
    path: PathBuf,
}

impl TempArchive {
    fn create(dir: &Path) -> Result<Self, BootstrapError> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_ARCHIVE_PREFIX)
            .suffix(TEMP_ARCHIVE_SUFFIX)
            .rand_bytes(16)
            .tempfile_in(dir)
            .map_err(|e| BootstrapError::io(dir, e))?;
        let (_, path) = file.keep().map_err(|e| BootstrapError::io(dir, e.error))?;

        tracing::debug!("Temporary archive: {}", path.display());
        Ok(Self { path })
    }

    fn discard(self) -> Option<CleanupWarning> {
        #[cfg(windows)]
        {
            if let Ok(meta) = fs::metadata(&self.path) {
                let mut perms = meta.permissions();
                perms.set_readonly(false);
                let _ = fs::set_permissions(&self.path, perms);
            }
        }

        match fs::remove_file(&self.path) {
            Ok(()) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => Some(CleanupWarning::ArchiveNotRemoved {
                path: self.path,
                reason: e.to_string(),
            }),
        }
    }
}

/// Move everything in `dir/folder` up into `dir`, then delete `dir/folder`.
///
/// The archive's own `.htaccess` stays behind and is deleted with the
/// folder; the separately fetched copy in `dir` is the one that counts.
pub fn merge_extracted_folder(dir: &Path, folder: &str) -> Vec<CleanupWarning> {
    let source = dir.join(folder);
    let mut warnings = Vec::new();

    tracing::info!("Moving {} into {}", source.display(), dir.display());
    merge_into(&source, dir, &[HTACCESS_FILE], &mut warnings);
    warnings.extend(remove_leftover(&source));

    warnings
}

fn merge_into(
    from_dir: &Path,
    to_dir: &Path,
    keep_behind: &[&str],
    warnings: &mut Vec<CleanupWarning>,
) {
    let entries = match fs::read_dir(from_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warnings.push(CleanupWarning::EntryNotMoved {
                path: from_dir.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warnings.push(CleanupWarning::EntryNotMoved {
                    path: from_dir.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let name = entry.file_name();
        if keep_behind.iter().any(|skip| name.as_os_str() == *skip) {
            tracing::debug!("Leaving {} in {}", name.to_string_lossy(), from_dir.display());
            continue;
        }

        let from = entry.path();
        let to = to_dir.join(name);
        move_entry(&from, &to, warnings);
    }
}

fn move_entry(from: &Path, to: &Path, warnings: &mut Vec<CleanupWarning>) {
    let from_is_dir = fs::symlink_metadata(from)
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if let Ok(existing) = fs::symlink_metadata(to) {
        if existing.is_dir() && from_is_dir {
            merge_into(from, to, &[], warnings);
            return;
        }

        let removed = if existing.is_dir() {
            fs::remove_dir_all(to)
        } else {
            fs::remove_file(to)
        };
        if let Err(e) = removed {
            warnings.push(CleanupWarning::EntryNotMoved {
                path: from.to_path_buf(),
                reason: format!("cannot replace {}: {}", to.display(), e),
            });
            return;
        }
    }

    if let Err(e) = fs::rename(from, to) {
        warnings.push(CleanupWarning::EntryNotMoved {
            path: from.to_path_buf(),
            reason: e.to_string(),
        });
    }
}

fn remove_leftover(path: &Path) -> Option<CleanupWarning> {
    if let Err(e) = fs::remove_dir_all(path) {
        tracing::debug!("Failed to remove {}: {}", path.display(), e);
    }

    if path.exists() {
        Some(CleanupWarning::FolderNotRemoved {
            path: path.to_path_buf(),
        })
    } else {
        None
    }
}
