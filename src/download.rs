use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Component, Path};
use tar::Archive;

pub async fn download_file(client: &reqwest::Client, url: &str, local_path: &Path) -> Result<()> {
    let filename = local_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Invalid download path: {}", local_path.display()))?;
    tracing::info!("Downloading {} from {}", filename, url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request {}", url))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Download of {} failed with status {}", url, status));
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Downloading {}", filename));

    let mut file = fs::File::create(local_path)
        .with_context(|| format!("Failed to create {}", local_path.display()))?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    use futures_util::StreamExt;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Failed while downloading {}", url))?;
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", local_path.display()))?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    file.flush()?;

    pb.finish_with_message("Download complete");
    tracing::debug!("Wrote {} bytes to {}", downloaded, local_path.display());
    Ok(())
}

pub fn remove_previous_install(install_dir: &Path) -> Result<()> {
    if install_dir.exists() {
        tracing::info!("Removing previous installation at {}", install_dir.display());
        fs::remove_dir_all(install_dir)
            .with_context(|| format!("Failed to remove {}", install_dir.display()))?;
    }
    Ok(())
}

/// Unpacks a `.tar.gz` archive below `extract_dir`, keeping the permission
/// bits recorded for every entry. Returns the number of entries written.
///
/// Entries that cannot be created on disk, or that would land outside
/// `extract_dir` (directly or through a symlink unpacked earlier), are logged
/// and skipped. A broken archive stream aborts the extraction.
pub fn extract_tar_gz(archive_path: &Path, extract_dir: &Path) -> Result<usize> {
    tracing::info!(
        "Extracting {} into {}",
        archive_path.display(),
        extract_dir.display()
    );

    fs::create_dir_all(extract_dir)
        .with_context(|| format!("Failed to create {}", extract_dir.display()))?;

    let file = fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);

    let mut written = 0usize;
    let entries = archive
        .entries()
        .with_context(|| format!("Failed to read archive: {}", archive_path.display()))?;

    for entry in entries {
        let mut entry = entry
            .with_context(|| format!("Failed to read entry in {}", archive_path.display()))?;
        let entry_path = entry
            .path()
            .context("Invalid entry path in archive")?
            .into_owned();

        if !is_safe_entry_path(&entry_path) {
            tracing::warn!("Skipping unsafe path in archive: {}", entry_path.display());
            continue;
        }

        tracing::debug!("{}", entry_path.display());
        match entry.unpack_in(extract_dir) {
            Ok(true) => written += 1,
            Ok(false) => {
                tracing::warn!("Skipping unsafe path in archive: {}", entry_path.display());
            }
            Err(e) => {
                tracing::warn!("Failed to extract {}: {}", entry_path.display(), e);
            }
        }
    }

    tracing::info!("Extracted {} entries", written);
    Ok(written)
}

fn is_safe_entry_path(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
