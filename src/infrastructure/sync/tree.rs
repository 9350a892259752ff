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

//! Directory comparison and mirroring.

use crate::shared::error::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl fmt::Display for TreeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            ChangeKind::Added => '+',
            ChangeKind::Modified => '~',
            ChangeKind::Removed => '-',
        };
        write!(f, "{} {}", marker, self.path.display())
    }
}

fn is_excluded(relative: &Path, excludes: &[String]) -> bool {
    relative.starts_with(".git") || excludes.iter().any(|e| relative.starts_with(e))
}

/// Files under `root` keyed by their path relative to `root`.
pub fn collect_files(root: &Path, excludes: &[String]) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    if root.exists() {
        collect_into(root, root, excludes, &mut files)?;
    }
    Ok(files)
}

fn collect_into(
    root: &Path,
    dir: &Path,
    excludes: &[String],
    files: &mut BTreeMap<PathBuf, Vec<u8>>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        if is_excluded(&relative, excludes) {
            continue;
        }

        if path.is_dir() {
            collect_into(root, &path, excludes, files)?;
        } else {
            files.insert(relative, fs::read(&path)?);
        }
    }

    Ok(())
}

/// Changes needed to turn `local` into `remote`.
pub fn diff_trees(remote: &Path, local: &Path, excludes: &[String]) -> Result<Vec<TreeChange>> {
    let remote_files = collect_files(remote, excludes)?;
    let local_files = collect_files(local, excludes)?;

    let mut changes: Vec<TreeChange> = remote_files
        .iter()
        .filter_map(|(path, content)| {
            let kind = match local_files.get(path) {
                None => ChangeKind::Added,
                Some(existing) if existing != content => ChangeKind::Modified,
                Some(_) => return None,
            };
            Some(TreeChange {
                path: path.clone(),
                kind,
            })
        })
        .collect();

    changes.extend(
        local_files
            .keys()
            .filter(|path| !remote_files.contains_key(*path))
            .map(|path| TreeChange {
                path: path.clone(),
                kind: ChangeKind::Removed,
            }),
    );

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(changes)
}

/// Applies `changes` so that `local` mirrors `remote`.
pub fn apply_changes(remote: &Path, local: &Path, changes: &[TreeChange]) -> Result<()> {
    for change in changes {
        let target = local.join(&change.path);

        match change.kind {
            ChangeKind::Added | ChangeKind::Modified => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(remote.join(&change.path), &target)?;
            }
            ChangeKind::Removed => {
                fs::remove_file(&target)?;
                prune_empty_parents(local, &target)?;
            }
        }
    }

    Ok(())
}

/// Removes directories between `path` and `root` left empty by a deletion.
fn prune_empty_parents(root: &Path, path: &Path) -> Result<()> {
    let mut dir = path.parent();

    while let Some(current) = dir {
        if current == root || !current.starts_with(root) {
            break;
        }
        if fs::read_dir(current)?.next().is_some() {
            break;
        }

        fs::remove_dir(current)?;
        dir = current.parent();
    }

    Ok(())
}
