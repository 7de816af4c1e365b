//! CLI subcommands.

pub mod status;
pub mod sync;

use clap::Args;

use subsync_core::{config, Config, ConfigError};

/// Flag overrides for the environment-provided inputs. Shared by every
/// subcommand; anything not given as a flag falls back to the environment.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Source spec `org/repo[/sub/dir]` (overrides $INPUT_SOURCE).
    #[arg(long)]
    pub source: Option<String>,

    /// Source branch (overrides $INPUT_SOURCE_BRANCH).
    #[arg(long)]
    pub source_branch: Option<String>,

    /// Target spec `org/repo[/sub/dir]` (overrides $INPUT_TARGET).
    #[arg(long)]
    pub target: Option<String>,

    /// Target branch (overrides $INPUT_TARGET_BRANCH; defaults to the
    /// source branch).
    #[arg(long)]
    pub target_branch: Option<String>,

    /// Gist id holding the sync records (overrides $INPUT_GIST).
    #[arg(long)]
    pub gist: Option<String>,
}

impl ConfigArgs {
    /// Environment-backed config with these flags layered on top.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| {
            let flag = match key {
                config::ENV_SOURCE => self.source.as_deref(),
                config::ENV_SOURCE_BRANCH => self.source_branch.as_deref(),
                config::ENV_TARGET => self.target.as_deref(),
                config::ENV_TARGET_BRANCH => self.target_branch.as_deref(),
                config::ENV_GIST => self.gist.as_deref(),
                _ => None,
            };
            flag.map(str::to_owned).or_else(|| std::env::var(key).ok())
        })
    }
}
