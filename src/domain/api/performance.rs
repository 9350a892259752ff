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

//! Node Tuning Operator performance profile (`performance.openshift.io/v2`).

use crate::domain::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "performance.openshift.io",
    version = "v2",
    kind = "PerformanceProfile"
)]
#[kube(status = "PerformanceProfileStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct PerformanceProfileSpec {
    pub cpu: CpuSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugepages: Option<HugePages>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub machine_config_pool_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub machine_config_label: BTreeMap<String, String>,
    pub node_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_time_kernel: Option<RealTimeKernel>,
    #[serde(rename = "numa", default, skip_serializing_if = "Option::is_none")]
    pub numa: Option<Numa>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net: Option<Net>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_tuning: Option<HardwareTuning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_load_hints: Option<WorkloadHints>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CpuSet {
    pub reserved: String,
    pub isolated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_isolated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offlined: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HugePages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_hugepages_size: Option<String>,
    #[serde(default)]
    pub pages: Vec<HugePage>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HugePage {
    pub size: String,
    pub count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeKernel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Numa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology_policy: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Net {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_level_networking: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<Device>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HardwareTuning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolated_cpu_freq: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_cpu_freq: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_power_consumption: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_pod_power_management: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceProfileStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuned: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_class: Option<String>,
}
