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

//! Hardware-manager plugin resources (`plugins.clcm.openshift.io/v1alpha1`).

use crate::domain::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A node handed out by a hardware plugin for a node allocation request.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "plugins.clcm.openshift.io",
    version = "v1alpha1",
    kind = "AllocatedNode",
    namespaced
)]
#[kube(status = "AllocatedNodeStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct AllocatedNodeSpec {
    pub node_allocation_request: String,
    pub group_name: String,
    pub hw_profile: String,
    #[serde(default)]
    pub hardware_plugin_ref: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedNodeStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmc: Option<Bmc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bmc {
    pub address: String,
    pub credentials_name: String,
}

/// Adaptor configuration for a hardware manager backend.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "plugins.clcm.openshift.io",
    version = "v1alpha1",
    kind = "HardwareManager",
    namespaced
)]
#[kube(status = "HardwareManagerStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct HardwareManagerSpec {
    /// One of `loopback` or `dell-hwmgr`.
    #[serde(rename = "adaptorId")]
    pub adaptor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loopback_data: Option<LoopbackData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dell_data: Option<DellData>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_level: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoopbackData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_info: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DellData {
    pub auth_secret: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "apiUrl")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_bundle_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tenant: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HardwareManagerStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}
