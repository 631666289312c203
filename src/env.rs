use crate::types::GoupdateSettings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const GO_DIR_NAME: &str = "go";

pub fn goroot_for(install_root: &Path) -> PathBuf {
    install_root.join(GO_DIR_NAME)
}

pub fn default_gopath() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(GO_DIR_NAME))
}

pub fn render_exports(goroot: &Path, gopath: &Path, settings: &GoupdateSettings) -> String {
    [
        format!("export GOROOT={}", goroot.display()),
        "export PATH=$GOROOT/bin:$PATH".to_string(),
        format!("export GOPATH={}", gopath.display()),
        "export PATH=$GOPATH/bin:$PATH".to_string(),
        format!("export GO111MODULE={}", settings.go111module),
        format!("export GOPROXY={}", settings.goproxy),
    ]
    .join("\n")
}

/// Writes the export block for the toolchain under `install_root` to stdout.
pub fn print_exports(install_root: &Path, settings: &GoupdateSettings) -> Result<()> {
    let gopath = default_gopath()?;
    println!(
        "{}",
        render_exports(&goroot_for(install_root), &gopath, settings)
    );
    Ok(())
}
