//! Release index retrieval and parsing.
//!
//! The index is the download page of the Go distribution site. It is read as
//! a sequence of rows:
//!
//! - HTML pages: every `<tr>` element is a row. A row describes a release
//!   archive when it links to `/dl/<version><suffix>` and carries the
//!   `Archive` kind label. Its checksum is the first `<tt>` element.
//! - Plain-text listings (no table rows at all): every line is a row. A line
//!   describes a release archive when it names `<version><suffix>`. Its
//!   checksum is the first 64 digit hex token after the filename.
//!
//! Versions look like `go1.21.0`; pre-releases such as `go1.22rc1` are never
//! matched. The index lists newest releases first, so the first row that
//! matches wins.

use crate::types::ReleaseInfo;
use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

const VERSION_PATTERN: &str = r"(go\d[.\d]*)";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("no release archive ending in '{suffix}' found in the index")]
    NoMatchingRelease { suffix: String },
    #[error("invalid index pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub async fn fetch_index(client: &reqwest::Client, url: &str) -> Result<String> {
    tracing::debug!("Fetching release index from: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch release index from {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Release index request to {} failed: {}", url, status);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read release index body from {}", url))?;
    tracing::debug!("Fetched {} bytes of index content", body.len());
    Ok(body)
}

pub fn parse_release_index(content: &str, suffix: &str) -> Result<ReleaseInfo, IndexError> {
    let row_re = Regex::new(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr>")?;
    let rows: Vec<&str> = row_re
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect();

    let release = if rows.is_empty() {
        tracing::debug!("No table rows in index, reading it as plain text");
        parse_text_rows(content, suffix)?
    } else {
        tracing::trace!("Scanning {} table rows", rows.len());
        parse_html_rows(&rows, suffix)?
    };

    release.ok_or_else(|| IndexError::NoMatchingRelease {
        suffix: suffix.to_string(),
    })
}

fn parse_html_rows(rows: &[&str], suffix: &str) -> Result<Option<ReleaseInfo>, IndexError> {
    let archive_re = Regex::new(&format!(
        r"/dl/{}{}",
        VERSION_PATTERN,
        regex::escape(suffix)
    ))?;
    let label_re = Regex::new(r"(?i)>\s*Archive\s*<")?;
    let checksum_re = Regex::new(r"(?is)<tt[^>]*>\s*([^<]*?)\s*</tt>")?;

    for row in rows {
        if !label_re.is_match(row) {
            continue;
        }
        let Some(cap) = archive_re.captures(row) else {
            continue;
        };

        let version = cap[1].to_string();
        let checksum = checksum_re
            .captures(row)
            .map(|c| c[1].to_string())
            .filter(|c| !c.is_empty());

        return Ok(Some(ReleaseInfo {
            filename: format!("{}{}", version, suffix),
            version,
            checksum,
        }));
    }

    Ok(None)
}

fn parse_text_rows(content: &str, suffix: &str) -> Result<Option<ReleaseInfo>, IndexError> {
    let archive_re = Regex::new(&format!(
        r"\b{}{}",
        VERSION_PATTERN,
        regex::escape(suffix)
    ))?;
    let checksum_re = Regex::new(r"\b([0-9a-fA-F]{64})\b")?;

    for line in content.lines() {
        let Some(cap) = archive_re.captures(line) else {
            continue;
        };

        let version = cap[1].to_string();
        let after_name = cap.get(0).map_or(line.len(), |m| m.end());
        let checksum = checksum_re
            .captures(&line[after_name..])
            .map(|c| c[1].to_string());

        return Ok(Some(ReleaseInfo {
            filename: format!("{}{}", version, suffix),
            version,
            checksum,
        }));
    }

    Ok(None)
}

/// Download location of an archive listed in the index at `source_url`.
pub fn archive_url(source_url: &str, filename: &str) -> String {
    if source_url.ends_with('/') {
        format!("{}{}", source_url, filename)
    } else {
        format!("{}/{}", source_url, filename)
    }
}
