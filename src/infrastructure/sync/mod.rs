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

//! Keeps vendored API type trees in step with their upstream repositories.

pub mod git;
pub mod rewrite;
pub mod tree;

use crate::domain::config::SyncTarget;
use crate::shared::error::{KubeError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use xshell::Shell;

pub use self::tree::{ChangeKind, TreeChange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    InSync,
    /// Local tree rewritten; number of files touched.
    Updated(usize),
    /// Check mode only; number of files that differ.
    Drift(usize),
    Failed(String),
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::InSync => write!(f, "in sync"),
            SyncStatus::Updated(n) => write!(f, "updated ({} files)", n),
            SyncStatus::Drift(n) => write!(f, "drift ({} files)", n),
            SyncStatus::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub name: String,
    pub local_api_directory: String,
    pub status: SyncStatus,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, SyncStatus::InSync | SyncStatus::Updated(_))
    }
}

pub struct RepoSyncer {
    sh: Shell,
    workdir: PathBuf,
    check: bool,
}

impl RepoSyncer {
    /// `workdir` is the root of the local git checkout holding the API trees.
    pub fn new(workdir: impl Into<PathBuf>, check: bool) -> Result<Self> {
        let workdir = workdir.into();
        let sh = Shell::new()?;
        sh.change_dir(&workdir);

        Ok(Self { sh, workdir, check })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Syncs every target; a failing target does not stop the others.
    pub fn sync_all(&self, targets: &[SyncTarget]) -> Vec<SyncReport> {
        targets
            .iter()
            .map(|target| {
                let status = match self.sync_target(target) {
                    Ok(status) => status,
                    Err(err) => {
                        error!(name = %target.name, error = %err, "Sync failed");
                        SyncStatus::Failed(err.to_string())
                    }
                };

                SyncReport {
                    name: target.name.clone(),
                    local_api_directory: target.local_api_directory.clone(),
                    status,
                }
            })
            .collect()
    }

    pub fn sync_target(&self, target: &SyncTarget) -> Result<SyncStatus> {
        target.validate()?;
        info!(name = %target.name, repo = %target.repo_link, "Syncing API directory");

        let scratch = tempfile::tempdir()?;
        let clone_dir = scratch.path().join(&target.name);
        git::sparse_clone(&self.sh, target, &clone_dir)?;

        let remote = clone_dir.join(&target.remote_api_directory);
        if !remote.is_dir() {
            return Err(KubeError::config_error(format!(
                "remote directory {} not found in {}",
                target.remote_api_directory, target.repo_link
            )));
        }

        let local = self.workdir.join(&target.local_api_directory);
        rewrite::rewrite_tree(&remote, &target.local_package(), &target.replace_imports)?;

        let changes = tree::diff_trees(&remote, &local, &target.excludes)?;
        if changes.is_empty() {
            return Ok(SyncStatus::InSync);
        }

        for change in &changes {
            info!(name = %target.name, "{}", change);
        }

        if self.check {
            warn!(name = %target.name, files = changes.len(), "Local API directory has drifted");
            return Ok(SyncStatus::Drift(changes.len()));
        }

        if let Err(err) = tree::apply_changes(&remote, &local, &changes) {
            warn!(name = %target.name, error = %err, "Copy failed, resetting local directory");
            git::reset_local(&self.sh, &local)?;
            return Err(err);
        }

        Ok(SyncStatus::Updated(changes.len()))
    }
}
