//! CLI arguments for the deploy and prepare-release tools, and logger setup.
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use strum::Display;

use crate::{Result, credentials::DEFAULT_TOKEN_FILE};

/// Owner assumed when prepare-release is given a bare repository name.
pub const DEFAULT_OWNER: &str = "FakeItEasy";

/// Publish packages to the registry and the GitHub release, then note the
/// release on every newly referenced issue.
#[derive(Parser, Debug)]
#[command(name = "deploy", version, about, long_about = None)]
pub struct DeployArgs {
    #[arg(short = 'r', long)]
    /// Repository (owner/repo).
    pub repo: String,

    #[arg(short = 't', long)]
    /// Tag name of the release to deploy.
    pub tag_name: String,

    #[arg(short = 'a', long)]
    /// Folder containing the package artifacts.
    pub artifacts_folder: PathBuf,

    #[arg(short = 'd', long, default_value_t = false)]
    /// Log what would be uploaded, pushed and commented without doing it.
    pub dry_run: bool,

    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    /// Token file used when GITHUB_TOKEN is unset.
    pub token_file: PathBuf,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

/// What prepare-release does with the existing release.
#[derive(ValueEnum, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Finalize the existing release as the new version and roll its
    /// milestone, draft and tracking issue forward.
    Next,
    /// Start a new release line alongside the existing one.
    Fork,
}

/// Roll release milestones, drafts and tracking issues forward.
#[derive(Parser, Debug)]
#[command(name = "prepare-release", version, about, long_about = None)]
pub struct PrepareArgs {
    /// Repository (owner/repo, or repo under --owner).
    pub repo: String,

    /// next | fork
    #[arg(value_enum)]
    pub action: Action,

    /// Version being released (next) or started (fork).
    #[arg(value_name = "NEW_VERSION")]
    pub new_version: String,

    /// Name of the existing draft release.
    pub existing_release: String,

    #[arg(long, default_value = DEFAULT_OWNER)]
    /// Owner used when the repository is given without one.
    pub owner: String,

    #[arg(long, default_value_t = false)]
    /// Log the changes without making them.
    pub dry_run: bool,

    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    /// Token file used when GITHUB_TOKEN is unset.
    pub token_file: PathBuf,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

pub fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_tools")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}
