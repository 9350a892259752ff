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

use crate::domain::api::sriov::SriovNetworkPoolConfig;
use crate::infrastructure::kubernetes::builder::validation::{non_empty_map, percentage};
use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{clean_all, list_builders, ListOptions};
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;
use tracing::debug;

pub type PoolConfigBuilder = Builder<SriovNetworkPoolConfig>;

const KIND: &str = SriovNetworkPoolConfig::KIND_NAME;

impl Kind for SriovNetworkPoolConfig {
    const KIND_NAME: &'static str = "sriovNetworkPoolConfig";
    const NAMESPACED: bool = true;
}

impl Builder<SriovNetworkPoolConfig> {
    pub fn new(client: &ApiClient, name: &str, namespace: &str) -> Self {
        debug!(name, namespace, "Initializing new SriovNetworkPoolConfig structure");

        Self::skeleton(client, name, Some(namespace))
    }

    /// Either a non-negative node count or a percentage in `1%..=100%`.
    pub fn with_max_unavailable(self, max_unavailable: IntOrString) -> Self {
        self.mutate(|def| {
            match &max_unavailable {
                IntOrString::Int(count) if *count < 0 => {
                    return Err(format!(
                        "{} 'maxUnavailable' must be non-negative, got {}",
                        KIND, count
                    ));
                }
                IntOrString::Int(_) => {}
                IntOrString::String(value) => percentage(KIND, "maxUnavailable", value)?,
            }

            def.spec.max_unavailable = Some(max_unavailable);
            Ok(())
        })
    }

    pub fn with_node_selector(self, node_selector: BTreeMap<String, String>) -> Self {
        self.mutate(|def| {
            non_empty_map(KIND, "nodeSelector", &node_selector)?;
            def.spec.node_selector = Some(LabelSelector {
                match_labels: Some(node_selector),
                ..Default::default()
            });
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<PoolConfigBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<PoolConfigBuilder>> {
    list_builders(client, Some(namespace), options).await
}

/// Deletes every pool config in `namespace` but the `default` one.
pub async fn clean_all_non_default(client: &ApiClient, namespace: &str) -> Result<()> {
    clean_all::<SriovNetworkPoolConfig>(client, Some(namespace), &[]).await
}
