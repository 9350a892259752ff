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

use crate::domain::api::hwmgr::AllocatedNode;
use crate::domain::condition::Condition;
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;

pub type AllocatedNodeBuilder = Builder<AllocatedNode>;

impl Kind for AllocatedNode {
    const KIND_NAME: &'static str = "allocatedNode";
    const NAMESPACED: bool = true;
}

impl HasConditions for AllocatedNode {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl Builder<AllocatedNode> {
    /// Hostname reported by the plugin once the node is provisioned.
    pub fn hostname(&self) -> Option<&str> {
        self.object
            .as_ref()?
            .status
            .as_ref()
            .map(|s| s.hostname.as_str())
            .filter(|h| !h.is_empty())
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<AllocatedNodeBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

/// Lists allocated nodes across every namespace.
pub async fn list_allocated_nodes(
    client: &ApiClient,
    options: &[ListOptions],
) -> Result<Vec<AllocatedNodeBuilder>> {
    list_builders(client, None, options).await
}
