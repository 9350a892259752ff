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

use std::time::Duration;

/// Poll cadence
pub const CONDITION_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const AVAILABILITY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Field manager reported to the API server
pub const DEFAULT_FIELD_MANAGER: &str = "kube-infra";

/// Singleton object names
pub const DEFAULT_OBJECT_NAME: &str = "default";
pub const CLUSTER_VERSION_NAME: &str = "version";

/// Shared validation messages
pub const MULTIPLE_LIST_OPTIONS: &str = "error: more than one ListOptions was passed";

/// SR-IOV ranges
pub const MTU_MIN: u16 = 1;
pub const MTU_MAX: u16 = 9192;
pub const VLAN_MAX: u16 = 4094;
pub const VLAN_QOS_MAX: u16 = 7;
pub const VF_INDEX_MAX: u32 = 63;

/// SR-IOV allow-lists
pub const SRIOV_DEVICE_TYPES: &[&str] = &["vfio-pci", "netdevice"];
pub const SRIOV_VLAN_PROTOCOLS: &[&str] = &["802.1q", "802.1Q", "802.1ad", "802.1AD"];
pub const SRIOV_LOG_LEVELS: &[&str] = &["panic", "error", "warning", "info", "debug", ""];
pub const SRIOV_LINK_STATES: &[&str] = &["auto", "enable", "disable"];
pub const SRIOV_DISABLE_PLUGINS: &[&str] = &["mellanox"];
/// Link speed reported for interfaces without carrier
pub const SRIOV_LINK_DOWN_SPEED: &str = "-1 Mb/s";

/// Performance profile allow-lists
pub const NUMA_TOPOLOGY_POLICIES: &[&str] = &["best-effort", "restricted", "single-numa-node"];
pub const HUGEPAGE_SIZES: &[&str] = &["2M", "1G"];

/// Hardware manager allow-lists
pub const HWMGR_ADAPTOR_IDS: &[&str] = &["loopback", "dell-hwmgr"];
pub const HWMGR_LOG_LEVELS: &[&str] = &["panic", "error", "warning", "info", "debug", ""];

/// Condition statuses
pub const CONDITION_TRUE: &str = "True";
pub const CONDITION_FALSE: &str = "False";

/// O-RAN provisioning conditions
pub const PROVISIONING_FULFILLED: &str = "fulfilled";
pub const CLUSTER_TEMPLATE_VALIDATED: &str = "ClusterTemplateValidated";

/// TALM conditions
pub const CGU_SUCCEEDED: &str = "Succeeded";

/// Cluster version conditions
pub const CLUSTER_VERSION_AVAILABLE: &str = "Available";
pub const CLUSTER_VERSION_PROGRESSING: &str = "Progressing";
