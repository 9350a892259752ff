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

use crate::domain::api::sriov::{PluginName, SriovOperatorConfig};
use crate::infrastructure::constants::{DEFAULT_OBJECT_NAME, SRIOV_DISABLE_PLUGINS};
use crate::infrastructure::kubernetes::builder::validation::{non_empty_map, one_of};
use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::shared::error::Result;
use std::collections::BTreeMap;
use tracing::debug;

pub type OperatorConfigBuilder = Builder<SriovOperatorConfig>;

const KIND: &str = SriovOperatorConfig::KIND_NAME;

impl Kind for SriovOperatorConfig {
    const KIND_NAME: &'static str = "sriovOperatorConfig";
    const NAMESPACED: bool = true;
}

impl Builder<SriovOperatorConfig> {
    /// The operator only honours the singleton named `default`.
    pub fn new(client: &ApiClient, namespace: &str) -> Self {
        debug!(namespace, "Initializing new SriovOperatorConfig structure");

        Self::skeleton(client, DEFAULT_OBJECT_NAME, Some(namespace))
    }

    pub fn with_injector(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.enable_injector = enabled;
            Ok(())
        })
    }

    pub fn with_operator_webhook(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.enable_operator_webhook = enabled;
            Ok(())
        })
    }

    pub fn with_config_daemon_node_selector(self, node_selector: BTreeMap<String, String>) -> Self {
        self.mutate(|def| {
            non_empty_map(KIND, "configDaemonNodeSelector", &node_selector)?;
            def.spec.config_daemon_node_selector = node_selector;
            Ok(())
        })
    }

    /// Replaces the disabled plugin set; every name must be on the allow-list.
    pub fn with_disable_plugins(self, plugins: &[&str]) -> Self {
        self.mutate(|def| {
            let parsed = plugins
                .iter()
                .map(|name| {
                    one_of(KIND, "disablePlugins", name, SRIOV_DISABLE_PLUGINS)?;
                    name.parse::<PluginName>()
                })
                .collect::<std::result::Result<Vec<_>, String>>()?;

            def.spec.disable_plugins = parsed;
            Ok(())
        })
    }

    pub fn with_disable_drain(self, disabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.disable_drain = disabled;
            Ok(())
        })
    }

    pub fn with_log_level(self, level: i32) -> Self {
        self.mutate(|def| {
            if !(0..=2).contains(&level) {
                return Err(format!(
                    "{} 'logLevel' must be between 0 and 2, got {}",
                    KIND, level
                ));
            }

            def.spec.log_level = level;
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, namespace: &str) -> Result<OperatorConfigBuilder> {
    Builder::pull(client, DEFAULT_OBJECT_NAME, Some(namespace)).await
}
