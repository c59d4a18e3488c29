use crate::config::{get_templates_dir, PROJECT_CONFIG_FILE};
use crate::error::BootstrapError;
use crate::templates;
use crate::types::InitOutcome;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Seeds a project directory with the default `october.yaml`.
pub struct ProjectInitializer {
    template_dir: PathBuf,
}

impl ProjectInitializer {
    /// Use templates already staged in `template_dir`.
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    /// Stage the bundled templates in the user data directory and use them.
    pub fn with_bundled_templates() -> Result<Self> {
        let dir = get_templates_dir()?;
        tracing::info!("Updating template files in {}", dir.display());
        templates::materialize(&dir)?;
        Ok(Self::new(dir))
    }

    pub fn template_path(&self) -> PathBuf {
        self.template_dir.join(PROJECT_CONFIG_FILE)
    }

    pub fn init(&self, directory: &Path) -> Result<InitOutcome, BootstrapError> {
        create_working_directory(directory)?;

        let target = directory.join(PROJECT_CONFIG_FILE);
        if target.exists() {
            tracing::info!("{} already exists, leaving it alone", target.display());
            return Ok(InitOutcome::AlreadyExists(target));
        }

        copy_template(&self.template_path(), &target)?;
        Ok(InitOutcome::Created(target))
    }
}

pub fn create_working_directory(dir: &Path) -> Result<(), BootstrapError> {
    match fs::create_dir_all(dir) {
        Ok(()) => {
            tracing::debug!("Working directory ready: {}", dir.display());
            Ok(())
        }
        Err(_) if dir.is_dir() => Ok(()),
        Err(source) => Err(BootstrapError::DirectoryCreation {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn copy_template(template: &Path, target: &Path) -> Result<(), BootstrapError> {
    if !template.is_file() {
        return Err(BootstrapError::TemplateMissing {
            path: template.to_path_buf(),
        });
    }

    fs::copy(template, target).map_err(|e| BootstrapError::io(target, e))?;

    if !target.exists() {
        return Err(BootstrapError::CopyVerification {
            path: target.to_path_buf(),
        });
    }

    tracing::debug!("Copied {} to {}", template.display(), target.display());
    Ok(())
}
