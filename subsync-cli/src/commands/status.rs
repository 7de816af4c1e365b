//! `subsync status` — report the last recorded sync without touching git.

use anyhow::Result;
use clap::Args;

use subsync_store::{GistClient, GistStore, SyncStateStore};

use crate::commands::ConfigArgs;

/// Arguments for `subsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit machine-readable JSON (`null` when no record exists).
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let store = GistStore::open(GistClient::new(config.token.clone()), &config.gist_id)?;
        let record = store.read(&config.tag())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(());
        }

        let relationship = format!(
            "{}@{} -> {}@{}",
            config.source, config.source_branch, config.target, config.target_branch
        );
        match record {
            Some(record) => println!(
                "last sync for {relationship}: {} on {}",
                record.sha, record.synced_at
            ),
            None => println!("no previous sync recorded for {relationship}"),
        }
        Ok(())
    }
}
