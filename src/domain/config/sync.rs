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

//! Repository-sync targets, one list per YAML file.

use crate::shared::error::{KubeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncTarget {
    pub name: String,
    pub repo_link: String,
    pub branch: String,
    pub remote_api_directory: String,
    pub local_api_directory: String,
    #[serde(default)]
    pub replace_imports: Vec<ImportReplacement>,
    /// Paths relative to the remote API directory that are never copied.
    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportReplacement {
    pub old: String,
    pub new: String,
}

impl SyncTarget {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("repo_link", &self.repo_link),
            ("branch", &self.branch),
            ("remote_api_directory", &self.remote_api_directory),
            ("local_api_directory", &self.local_api_directory),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(KubeError::config_error(format!(
                    "sync target '{}': '{}' cannot be empty",
                    self.name, field
                )));
            }
        }

        if self.replace_imports.iter().any(|r| r.old.is_empty()) {
            return Err(KubeError::config_error(format!(
                "sync target '{}': replace_imports entries need a non-empty 'old'",
                self.name
            )));
        }

        Ok(())
    }

    /// Package name the synced sources are rewritten to.
    pub fn local_package(&self) -> String {
        Path::new(&self.local_api_directory)
            .file_name()
            .map(|n| n.to_string_lossy().replace('-', "_"))
            .unwrap_or_default()
    }
}

/// Reads every `*.yaml` / `*.yml` file in `dir`, in name order.
pub fn load_sync_targets<P: AsRef<Path>>(dir: P) -> Result<Vec<SyncTarget>> {
    let dir = dir.as_ref();
    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    files.sort();

    let mut targets = Vec::new();
    for file in files {
        let content = fs::read_to_string(&file)?;
        let parsed: Vec<SyncTarget> = serde_yaml::from_str(&content).map_err(|e| {
            KubeError::config_error(format!("Failed to parse {}: {}", file.display(), e))
        })?;

        for target in parsed {
            target.validate()?;
            targets.push(target);
        }
    }

    Ok(targets)
}
