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

// CLI definition for api-sync

use super::sync::SyncCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "api-sync",
    version,
    about = "Sync vendored Kubernetes API types from upstream repositories",
    long_about = "Clones each configured repository's API directory, rewrites package and import paths, and mirrors it into the local tree"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub sync: SyncCommand,
}
