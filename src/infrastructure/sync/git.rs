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

use crate::domain::config::SyncTarget;
use crate::shared::error::Result;
use std::path::Path;
use tracing::debug;
use xshell::{cmd, Shell};

/// Shallow, blobless clone of `target.branch` that only materialises the
/// remote API directory.
pub fn sparse_clone(sh: &Shell, target: &SyncTarget, dest: &Path) -> Result<()> {
    let repo = &target.repo_link;
    let branch = &target.branch;
    let remote_dir = &target.remote_api_directory;

    debug!(repo = %repo, branch = %branch, dest = %dest.display(), "Cloning repository");

    cmd!(sh, "git clone --depth 1 --filter=blob:none --sparse -b {branch} {repo} {dest}")
        .quiet()
        .run()?;

    let _dir = sh.push_dir(dest);
    cmd!(sh, "git sparse-checkout set {remote_dir}").quiet().run()?;

    Ok(())
}

/// Restores `dir` to the last committed state, dropping untracked files.
pub fn reset_local(sh: &Shell, dir: &Path) -> Result<()> {
    debug!(dir = %dir.display(), "Resetting local directory");

    cmd!(sh, "git checkout -- {dir}").quiet().run()?;
    cmd!(sh, "git clean -fd {dir}").quiet().run()?;

    Ok(())
}
