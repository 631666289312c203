use crate::detect::detect_local_version;
use crate::download::{download_file, extract_tar_gz, remove_previous_install};
use crate::env::goroot_for;
use crate::index::{archive_url, fetch_index, parse_release_index, IndexError};
use crate::types::*;
use crate::verify::{check_local_archive, checksum_matches};
use anyhow::{bail, Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub platform: PlatformInfo,
    /// Install even when the local version already matches.
    pub force: bool,
    pub skip_delay: bool,
    /// Stop after comparing versions.
    pub check_only: bool,
    /// Suppress status lines on stderr.
    pub quiet: bool,
}

impl UpdateOptions {
    fn status(&self, line: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{}", line);
        }
    }
}

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("goupdate/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Newest release for `platform`, or `None` when the index has no archive
/// for it.
pub async fn latest_release(
    client: &reqwest::Client,
    source_url: &str,
    platform: &PlatformInfo,
) -> Result<Option<ReleaseInfo>> {
    let content = fetch_index(client, source_url).await?;
    let suffix = platform.archive_suffix();

    match parse_release_index(&content, &suffix) {
        Ok(release) => {
            tracing::info!(
                "Latest release {} (sha256: {})",
                release.version,
                release.checksum.as_deref().unwrap_or("none")
            );
            Ok(Some(release))
        }
        Err(IndexError::NoMatchingRelease { suffix }) => {
            tracing::warn!("The index at {} lists no archive ending in {}", source_url, suffix);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_update(settings: &GoupdateSettings, opts: &UpdateOptions) -> Result<UpdateOutcome> {
    opts.status(format_args!(
        "Target platform: {}/{}",
        style(&opts.platform.os).bold(),
        style(&opts.platform.arch).bold()
    ));

    let client = http_client()?;
    let current = detect_local_version(&settings.go_binary);
    tracing::info!("Installed version: {}", current.as_deref().unwrap_or("none"));

    let Some(release) = latest_release(&client, &settings.source_url, &opts.platform).await? else {
        return Ok(UpdateOutcome::NoRelease {
            suffix: opts.platform.archive_suffix(),
        });
    };

    if opts.check_only {
        return Ok(UpdateOutcome::Checked {
            latest: release.version,
            current,
        });
    }

    let current_label = current.clone().unwrap_or_else(|| "none".to_string());
    if !opts.force && current.as_deref() == Some(release.version.as_str()) {
        opts.status(format_args!(
            "Latest version [{}]. Current [{}]. Skip",
            release.version, current_label
        ));
        return Ok(UpdateOutcome::UpToDate {
            version: release.version,
        });
    }

    opts.status(format_args!(
        "New version [{}] found! Current [{}]",
        style(&release.version).green().bold(),
        current_label
    ));

    if !opts.skip_delay && settings.download_delay_secs > 0 {
        opts.status(format_args!(
            "Installing in {} seconds, press Ctrl-C to abort",
            settings.download_delay_secs
        ));
        tokio::time::sleep(Duration::from_secs(settings.download_delay_secs)).await;
    }

    let install_root = settings
        .install_root()
        .context("Could not determine install root")?;
    let goroot =
        install_release(&client, &settings.source_url, &release, &install_root, opts).await?;

    opts.status(style("Update finished").green());
    Ok(UpdateOutcome::Installed {
        version: release.version,
        goroot,
    })
}

async fn install_release(
    client: &reqwest::Client,
    source_url: &str,
    release: &ReleaseInfo,
    install_root: &Path,
    opts: &UpdateOptions,
) -> Result<PathBuf> {
    fs::create_dir_all(install_root)
        .with_context(|| format!("Failed to create {}", install_root.display()))?;

    let archive_path = install_root.join(&release.filename);

    if check_local_archive(&archive_path, release.checksum.as_deref()) {
        tracing::info!("Reusing verified archive {}", archive_path.display());
    } else {
        let url = archive_url(source_url, &release.filename);
        opts.status(format_args!("Download {}", url));
        download_file(client, &url, &archive_path).await?;

        if let Some(expected) = &release.checksum {
            if !checksum_matches(&archive_path, expected)? {
                if let Err(e) = fs::remove_file(&archive_path) {
                    tracing::warn!("Could not remove {}: {}", archive_path.display(), e);
                }
                bail!(
                    "Downloaded archive {} does not match the published SHA256 {}",
                    release.filename,
                    expected
                );
            }
            tracing::info!("SHA256 check passed for {}", release.filename);
        }
        opts.status("Download finished");
    }

    let goroot = goroot_for(install_root);
    remove_previous_install(&goroot)?;
    extract_tar_gz(&archive_path, install_root)?;
    Ok(goroot)
}
