//! Sync command - run one synchronization pass
//!
//! 1. Validates the loaded configuration (fatal before any remote call)
//! 2. Builds the gallery API provider from the configured credentials
//! 3. Runs the sync engine and prints the resulting report
//!
//! The command exits non-zero when the run finished with scoped errors, so
//! scripts can tell a silent success from a success-with-errors.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use foliosync_api::GalleryApiProvider;
use foliosync_core::config::Config;
use foliosync_sync::engine::SyncEngine;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Override the configured worker count for this run
    #[arg(long)]
    pub workers: Option<usize>,

    /// Do not replace remote photos even when the local file is newer
    #[arg(long)]
    pub no_reupload: bool,
}

impl SyncCommand {
    pub async fn execute(&self, mut config: Config, format: OutputFormat) -> Result<()> {
        if let Some(workers) = self.workers {
            config.sync.workers = workers;
        }
        if self.no_reupload {
            config.sync.reupload_newer = false;
        }

        let errors = config.validate();
        if !errors.is_empty() {
            for error in &errors {
                eprintln!("configuration error: {error}");
            }
            bail!("invalid configuration ({} problems)", errors.len());
        }

        info!(
            local_root = %config.sync.local_root.display(),
            base_url = %config.api.base_url,
            "Starting sync"
        );

        let provider = Arc::new(GalleryApiProvider::new(
            config.api.base_url.clone(),
            config.account.username.clone(),
            config.account.password.clone(),
        ));
        let engine = SyncEngine::new(provider, &config);
        let report = engine.sync().await?;

        output::print_report(&report, format);

        if !report.is_clean() {
            bail!("sync completed with {} errors", report.errors.len());
        }
        Ok(())
    }
}
