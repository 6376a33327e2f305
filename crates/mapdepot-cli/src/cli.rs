//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use mapdepot_core::ElevationOverride;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mapdepot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// List written files in the result output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Relay channel token. Set by the parent process when this one is the
    /// elevated helper; progress lines go over the channel instead of
    /// standard output.
    #[arg(long, global = true, value_name = "CHANNEL", hide = true)]
    pub relay: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install a map package into a mod's maps directory
    Install(InstallArgs),
    /// Extract a package archive without installing it
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
pub struct InstallArgs {
    /// Path to the map package (archive or bare map file)
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Maps root directory the package is installed under
    #[arg(value_name = "DEST_ROOT")]
    pub dest_root: PathBuf,

    /// Mod the package belongs to
    #[arg(long = "mod", value_name = "MOD")]
    pub mod_id: String,

    /// Override the platform elevation decision
    #[arg(long, value_enum, default_value_t = ElevationChoice::Auto)]
    pub elevation: ElevationChoice,

    /// Executable to relaunch for elevated installs (default: this one)
    #[arg(long, value_name = "PATH")]
    pub helper: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the package archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Elevation decision override, as surfaced on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ElevationChoice {
    /// Follow the platform decision
    Auto,
    /// Always relaunch elevated
    Force,
    /// Never relaunch; run inline
    Skip,
}

impl From<ElevationChoice> for ElevationOverride {
    fn from(choice: ElevationChoice) -> Self {
        match choice {
            ElevationChoice::Auto => Self::Auto,
            ElevationChoice::Force => Self::Force,
            ElevationChoice::Skip => Self::Skip,
        }
    }
}
