use clap::{Args, Parser, Subcommand};

pub(crate) fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    if let Some(tag) = option_env!("GOUPDATE_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("GOUPDATE_GIT_COMMIT").unwrap_or("unknown");

    // Leaked once at startup so clap can hold a &'static str
    let version = format!("v{}-{}", BASE_VERSION, commit);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "goupdate")]
#[command(about = "Keep a local Go toolchain in sync with the official download index")]
#[command(
    version = get_version(),
    propagate_version = true,
    after_help = "Examples:\n  eval \"$(goupdate)\"\n  goupdate update --yes --install-root ~/sdk\n  goupdate check --os darwin --arch arm64\n  goupdate config set goproxy=https://proxy.golang.org,direct"
)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to `update`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install the latest Go release if it is newer, then print shell exports
    Update(UpdateArgs),

    /// Compare the installed version with the latest release without installing
    Check(TargetArgs),

    /// Print the shell exports for the managed installation
    Env(TargetArgs),

    /// Manage goupdate's configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the current version
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Target operating system in Go naming (e.g. 'linux', 'darwin')
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture in Go naming (e.g. 'amd64', 'arm64')
    #[arg(long)]
    pub arch: Option<String>,

    /// Release index URL (e.g. 'https://go.dev/dl/')
    #[arg(long)]
    pub source: Option<String>,

    /// Directory that receives the archive and the 'go' tree
    #[arg(long)]
    pub install_root: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Skip the pause before downloading
    #[arg(short, long)]
    pub yes: bool,

    /// Reinstall even if the installed version is already the latest
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration setting
    Get {
        /// Key to get (if omitted, shows all settings)
        key: Option<String>,
    },
    /// Set a configuration setting
    Set {
        /// Key and value (e.g., 'download-delay-secs=0' or 'download-delay-secs 0')
        #[arg(trailing_var_arg = true, required = true)]
        args: Vec<String>,
    },
    /// Reset a configuration setting to its default
    Unset {
        /// Key to unset (e.g., 'goproxy')
        key: String,
    },
    /// Show full configuration
    Show {
        /// Output format (json, yaml, plain)
        #[arg(long, default_value = "json")]
        format: String,
    },
}
