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

//! SR-IOV network operator resources (`sriovnetwork.openshift.io/v1`).

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Secondary network attached to SR-IOV virtual functions.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetwork",
    namespaced
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkSpec {
    pub resource_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ipam: String,
    #[serde(default)]
    pub vlan: u16,
    #[serde(rename = "vlanQoS", default, skip_serializing_if = "Option::is_none")]
    pub vlan_qos: Option<u16>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vlan_proto: String,
    /// "on" or "off"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub spoof_chk: String,
    /// "on" or "off"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trust: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tx_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tx_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub capabilities: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub meta_plugins: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_file: String,
}

/// Requests virtual functions on the nodes matched by `node_selector`.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetworkNodePolicy",
    namespaced
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkNodePolicySpec {
    pub resource_name: String,
    pub node_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u16>,
    #[serde(rename = "numVfs")]
    pub num_vfs: u32,
    pub nic_selector: SriovNetworkNicSelector,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_type: String,
    #[serde(default)]
    pub is_rdma: bool,
    #[serde(default)]
    pub need_vhost_net: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_type: String,
    #[serde(default)]
    pub externally_managed: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkNicSelector {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    #[serde(rename = "deviceID", default, skip_serializing_if = "String::is_empty")]
    pub device_id: String,
    /// Entries are either a PF name or `<pf>#<firstVF>-<lastVF>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pf_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_devices: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub net_filter: String,
}

/// Per-node view the config daemon reports back.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetworkNodeState",
    namespaced
)]
#[kube(status = "SriovNetworkNodeStateStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkNodeStateSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<SriovInterface>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SriovInterface {
    pub pci_address: String,
    #[serde(default)]
    pub num_vfs: u32,
    #[serde(default)]
    pub mtu: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_type: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkNodeStateStatus {
    #[serde(default)]
    pub interfaces: Vec<InterfaceExt>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sync_status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_sync_error: String,
}

/// Physical function as discovered on the node.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceExt {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub driver: String,
    pub pci_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_id: String,
    #[serde(default)]
    pub mtu: u32,
    #[serde(default)]
    pub num_vfs: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_speed: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link_type: String,
    #[serde(rename = "totalvfs", default)]
    pub total_vfs: u32,
    #[serde(rename = "Vfs", default, skip_serializing_if = "Vec::is_empty")]
    pub vfs: Vec<VirtualFunction>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VirtualFunction {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub driver: String,
    pub pci_address: String,
    #[serde(rename = "vfID", default)]
    pub vf_id: u32,
}

/// Drain/parallelism settings for a group of nodes.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetworkPoolConfig",
    namespaced
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkPoolConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<LabelSelector>,
}

/// Operator-wide configuration; a singleton named `default`.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovOperatorConfig",
    namespaced
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct SriovOperatorConfigSpec {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config_daemon_node_selector: BTreeMap<String, String>,
    #[serde(default)]
    pub enable_injector: bool,
    #[serde(default)]
    pub enable_operator_webhook: bool,
    #[serde(default)]
    pub log_level: i32,
    #[serde(default)]
    pub disable_drain: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable_plugins: Vec<PluginName>,
}

/// Config-daemon vendor plugins that may be disabled.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PluginName {
    Mellanox,
}

impl PluginName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginName::Mellanox => "mellanox",
        }
    }
}

impl std::str::FromStr for PluginName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mellanox" => Ok(PluginName::Mellanox),
            _ => Err(format!("invalid plugin name: {}", s)),
        }
    }
}
