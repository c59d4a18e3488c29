use crate::error::BootstrapError;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::{Component, Path};
use zip::ZipArchive;

/// Fetches a URL and writes the whole body to `dest`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, BootstrapError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpTransport {
    pub fn new(show_progress: bool) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("october-bootstrap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            show_progress,
        })
    }

    fn progress_bar(&self, total_size: u64, filename: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        // GitHub archive downloads are chunked, so there is often no length
        let (pb, template) = if total_size > 0 {
            (
                ProgressBar::new(total_size),
                "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )
        } else {
            (
                ProgressBar::new_spinner(),
                "{msg} {spinner:.green} [{elapsed_precise}] {bytes}",
            )
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Downloading {}", filename));
        pb
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, BootstrapError> {
        let download_error = |reason: String| BootstrapError::Download {
            url: url.to_string(),
            reason,
        };

        tracing::info!("Downloading {}...", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {}", status)));
        }

        let filename = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| url.to_string());
        let pb = self.progress_bar(response.content_length().unwrap_or(0), &filename);

        let mut file = fs::File::create(dest).map_err(|e| BootstrapError::io(dest, e))?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error(e.to_string()))?;
            file.write_all(&chunk)
                .map_err(|e| BootstrapError::io(dest, e))?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush().map_err(|e| BootstrapError::io(dest, e))?;

        pb.finish_and_clear();
        tracing::debug!("Wrote {} bytes to {}", downloaded, dest.display());
        Ok(downloaded)
    }
}

/// Extract `archive_path` into `extract_dir` and return the name of the
/// archive's single top-level folder.
///
/// The layout is checked before anything is written, so an archive that
/// does not hold exactly one top-level folder leaves `extract_dir` untouched.
pub fn extract_zip(archive_path: &Path, extract_dir: &Path) -> Result<String, BootstrapError> {
    tracing::info!("Extracting {}...", archive_path.display());

    let file = fs::File::open(archive_path).map_err(|e| BootstrapError::io(archive_path, e))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| BootstrapError::extraction(archive_path, e))?;

    let folder = top_level_folder(&mut archive)
        .map_err(|reason| BootstrapError::extraction(archive_path, reason))?;

    // Directory modes are applied once their contents are written, deepest first
    let mut dir_modes = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| BootstrapError::extraction(archive_path, e))?;

        let relative = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                tracing::warn!("Skipping unsafe path in zip: {}", entry.name());
                continue;
            }
        };
        let outpath = extract_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| BootstrapError::extraction(archive_path, e))?;
            if let Some(mode) = entry.unix_mode() {
                dir_modes.push((outpath, mode));
            }
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| BootstrapError::extraction(archive_path, e))?;
        }
        let mut outfile = fs::File::create(&outpath)
            .map_err(|e| BootstrapError::extraction(archive_path, e))?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|e| BootstrapError::extraction(archive_path, e))?;

        if let Some(mode) = entry.unix_mode() {
            restore_mode(&outpath, mode).map_err(|e| BootstrapError::extraction(archive_path, e))?;
        }
    }

    dir_modes.sort_by_key(|(path, _)| std::cmp::Reverse(path.components().count()));
    for (path, mode) in dir_modes {
        restore_mode(&path, mode).map_err(|e| BootstrapError::extraction(archive_path, e))?;
    }

    tracing::info!("Extracted {} into {}", folder, extract_dir.display());
    Ok(folder)
}

#[cfg(unix)]
fn restore_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn restore_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn top_level_folder<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, String> {
    let mut roots = BTreeSet::new();

    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| e.to_string())?;
        let path = match entry.enclosed_name() {
            Some(path) => path,
            None => continue,
        };

        let mut components = path.components();
        let first = match components.next() {
            Some(Component::Normal(first)) => first.to_string_lossy().to_string(),
            _ => continue,
        };
        if components.next().is_none() && !entry.is_dir() {
            return Err(format!("unexpected top-level file '{}'", first));
        }
        roots.insert(first);
    }

    if roots.len() > 1 {
        let names: Vec<_> = roots.into_iter().collect();
        return Err(format!(
            "expected a single top-level folder, found: {}",
            names.join(", ")
        ));
    }

    roots
        .into_iter()
        .next()
        .ok_or_else(|| "archive is empty".to_string())
}
