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

//! Source rewriting applied to freshly cloned API trees.

use crate::domain::config::ImportReplacement;
use crate::shared::error::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn package_clause() -> &'static Regex {
    static PACKAGE: OnceLock<Regex> = OnceLock::new();
    PACKAGE.get_or_init(|| Regex::new(r"(?m)^package\s+\w+").expect("static package pattern"))
}

/// Renames the first package clause to `package` and applies every import
/// substitution in order.
pub fn rewrite_source(content: &str, package: &str, replacements: &[ImportReplacement]) -> String {
    let mut rewritten = package_clause()
        .replace(content, format!("package {}", package).as_str())
        .into_owned();

    for replacement in replacements {
        rewritten = rewritten.replace(&replacement.old, &replacement.new);
    }

    rewritten
}

/// Rewrites every UTF-8 file under `root` in place; returns how many changed.
pub fn rewrite_tree(root: &Path, package: &str, replacements: &[ImportReplacement]) -> Result<usize> {
    let mut changed = 0;

    for entry in fs::read_dir(root)? {
        let path = entry?.path();

        if path.is_dir() {
            changed += rewrite_tree(&path, package, replacements)?;
            continue;
        }

        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let rewritten = rewrite_source(&content, package, replacements);
        if rewritten != content {
            fs::write(&path, rewritten)?;
            changed += 1;
        }
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacement(old: &str, new: &str) -> ImportReplacement {
        ImportReplacement {
            old: old.to_string(),
            new: new.to_string(),
        }
    }

    #[test]
    fn test_rewrite_source() {
        let source = "// +kubebuilder:object:generate=true\npackage v1\n\nimport (\n\t\"github.com/upstream/operator/api/v1/common\"\n)\n";
        let rewritten = rewrite_source(
            source,
            "sriov_network_operator",
            &[replacement("github.com/upstream/operator/api/v1", "example.com/schemes/sriov")],
        );

        assert!(rewritten.contains("\npackage sriov_network_operator\n"));
        assert!(rewritten.contains("\"example.com/schemes/sriov/common\""));
        assert!(!rewritten.contains("package v1"));
    }

    #[test]
    fn test_rewrite_tree_counts_changes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("types.go"), "package v1\n").unwrap();
        fs::write(dir.path().join("nested/doc.go"), "package local\n").unwrap();
        fs::write(dir.path().join("blob.bin"), [0xffu8, 0xfe, 0x00]).unwrap();

        let changed = rewrite_tree(dir.path(), "local", &[]).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("types.go")).unwrap(),
            "package local\n"
        );
    }
}
