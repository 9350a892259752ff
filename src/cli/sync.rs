// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `api-sync` command

use crate::cli::display::TableRenderer;
use crate::domain::config::load_sync_targets;
use crate::infrastructure::sync::RepoSyncer;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct SyncCommand {
    /// Directory holding the *.yaml sync target lists
    #[arg(long, value_name = "DIR")]
    pub config_dir: PathBuf,

    /// Report drift instead of rewriting the local trees
    #[arg(long)]
    pub check: bool,

    /// Root of the local checkout the API directories are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,
}

impl SyncCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let targets = load_sync_targets(&self.config_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load sync targets from {}: {}",
                self.config_dir.display(),
                e
            )
        })?;

        if targets.is_empty() {
            println!("No sync targets found in {}", self.config_dir.display());
            return Ok(());
        }

        let syncer = RepoSyncer::new(self.workdir.clone(), self.check)
            .map_err(|e| anyhow::anyhow!("Failed to prepare sync workspace: {}", e))?;

        // git and the filesystem walk block, keep them off the async workers
        let reports = tokio::task::spawn_blocking(move || syncer.sync_all(&targets)).await?;

        println!("{}", TableRenderer::new().render_sync_reports(&reports));

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            anyhow::bail!("{} of {} sync targets did not succeed", failed, reports.len());
        }

        Ok(())
    }
}
