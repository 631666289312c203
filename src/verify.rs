use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Lowercase hex SHA-256 of the whole file.
pub fn compute_sha256(file_path: &Path) -> Result<String> {
    let mut file = fs::File::open(file_path)
        .with_context(|| format!("Failed to open file for checksum: {}", file_path.display()))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).with_context(|| {
            format!("Failed to read file for checksum: {}", file_path.display())
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

pub fn checksum_matches(file_path: &Path, expected: &str) -> Result<bool> {
    let computed = compute_sha256(file_path)?;
    Ok(computed.eq_ignore_ascii_case(expected.trim()))
}

/// Decides whether a previously downloaded archive can be reused.
///
/// Returns `false` when the file is missing, unreadable, cannot be verified
/// because no checksum is known, or does not match. A mismatching file is
/// deleted so the next download starts from scratch.
pub fn check_local_archive(file_path: &Path, expected: Option<&str>) -> bool {
    if !file_path.exists() {
        return false;
    }

    let Some(expected) = expected else {
        tracing::info!(
            "No checksum published for {}, downloading again",
            file_path.display()
        );
        return false;
    };

    match checksum_matches(file_path, expected) {
        Ok(true) => {
            tracing::info!("SHA256 check passed for {}", file_path.display());
            true
        }
        Ok(false) => {
            tracing::warn!("SHA256 check failed for {}", file_path.display());
            if let Err(e) = fs::remove_file(file_path) {
                tracing::warn!("Could not remove {}: {}", file_path.display(), e);
            }
            false
        }
        Err(e) => {
            tracing::warn!("{:#}", e);
            false
        }
    }
}
