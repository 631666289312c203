use serde::{Deserialize, Serialize};
use std::cmp::PartialEq;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_URL: &str = "https://golang.google.cn/dl/";
pub const DEFAULT_GOPROXY: &str = "https://goproxy.cn,direct";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoupdateSettings {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_go_binary")]
    pub go_binary: String,
    /// Directory that receives the archive and the `go` tree. Unset means
    /// the current working directory.
    #[serde(default)]
    pub install_root: Option<String>,
    #[serde(default = "default_goproxy")]
    pub goproxy: String,
    #[serde(default = "default_go111module")]
    pub go111module: String,
    #[serde(default = "default_download_delay_secs")]
    pub download_delay_secs: u64,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}
fn default_go_binary() -> String {
    "go".to_string()
}
fn default_goproxy() -> String {
    DEFAULT_GOPROXY.to_string()
}
fn default_go111module() -> String {
    "auto".to_string()
}
fn default_download_delay_secs() -> u64 {
    5
}

impl Default for GoupdateSettings {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            go_binary: default_go_binary(),
            install_root: None,
            goproxy: default_goproxy(),
            go111module: default_go111module(),
            download_delay_secs: default_download_delay_secs(),
        }
    }
}

impl GoupdateSettings {
    /// Absolute install root; relative settings resolve against the
    /// current directory.
    pub fn install_root(&self) -> std::io::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.install_root {
            Some(root) => cwd.join(root),
            None => cwd,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GoupdateConfig {
    #[serde(default)]
    pub settings: GoupdateSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: String,
    pub arch: String,
}

impl PlatformInfo {
    /// `.linux-amd64.tar.gz` style filename ending used by the index.
    pub fn archive_suffix(&self) -> String {
        format!(".{}-{}.tar.gz", self.os, self.arch)
    }
}

/// Newest release found in the index for one platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: String,
    pub filename: String,
    pub checksum: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate { version: String },
    NoRelease { suffix: String },
    Installed { version: String, goroot: PathBuf },
    Checked { latest: String, current: Option<String> },
}
