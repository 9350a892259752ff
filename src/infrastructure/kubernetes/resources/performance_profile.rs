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

//! Node Tuning Operator performance profiles.
//!
//! The operator rejects in-place edits to several spec fields, so callers
//! changing CPU sets, huge pages or NUMA policy on an existing profile should
//! use `update(true)`: the profile is then deleted and recreated from the
//! definition, and nodes are re-tuned from scratch.

use crate::domain::api::performance::{
    CpuSet, Device, HardwareTuning, HugePage, HugePages, Net, Numa, PerformanceProfile,
    PerformanceProfileSpec, RealTimeKernel, WorkloadHints,
};
use crate::domain::condition::Condition;
use crate::infrastructure::constants::{HUGEPAGE_SIZES, NUMA_TOPOLOGY_POLICIES};
use crate::infrastructure::kubernetes::builder::validation::{non_empty, non_empty_map, one_of};
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;
use std::collections::BTreeMap;
use tracing::debug;

pub type PerformanceProfileBuilder = Builder<PerformanceProfile>;

const KIND: &str = PerformanceProfile::KIND_NAME;

impl Kind for PerformanceProfile {
    const KIND_NAME: &'static str = "performanceProfile";
    const NAMESPACED: bool = false;
}

impl HasConditions for PerformanceProfile {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl Builder<PerformanceProfile> {
    pub fn new(
        client: &ApiClient,
        name: &str,
        isolated: &str,
        reserved: &str,
        node_selector: BTreeMap<String, String>,
    ) -> Self {
        debug!(name, isolated, reserved, "Initializing new PerformanceProfile structure");

        let mut builder = Self::skeleton(client, name, None);
        builder.definition.spec = PerformanceProfileSpec {
            cpu: CpuSet {
                isolated: isolated.to_string(),
                reserved: reserved.to_string(),
                ..Default::default()
            },
            node_selector: node_selector.clone(),
            ..Default::default()
        };

        let checks = non_empty(KIND, "isolated", isolated)
            .and_then(|_| non_empty(KIND, "reserved", reserved))
            .and_then(|_| non_empty_map(KIND, "nodeSelector", &node_selector));

        if let Err(msg) = checks {
            builder.set_error(msg);
        }

        builder
    }

    /// Sets the default huge page size and the per-size page counts.
    pub fn with_hugepages(self, default_size: &str, pages: Vec<HugePage>) -> Self {
        self.mutate(|def| {
            one_of(KIND, "defaultHugepagesSize", default_size, HUGEPAGE_SIZES)?;

            if pages.is_empty() {
                return Err(format!("{} 'hugepages' cannot be empty", KIND));
            }

            for page in &pages {
                one_of(KIND, "hugepages.size", &page.size, HUGEPAGE_SIZES)?;
                if page.count <= 0 {
                    return Err(format!(
                        "{} 'hugepages.count' must be greater than 0, got {}",
                        KIND, page.count
                    ));
                }
            }

            def.spec.hugepages = Some(HugePages {
                default_hugepages_size: Some(default_size.to_string()),
                pages,
            });
            Ok(())
        })
    }

    pub fn with_numa_topology(self, policy: &str) -> Self {
        self.mutate(|def| {
            one_of(KIND, "topologyPolicy", policy, NUMA_TOPOLOGY_POLICIES)?;
            def.spec.numa = Some(Numa {
                topology_policy: Some(policy.to_string()),
            });
            Ok(())
        })
    }

    pub fn with_machine_config_pool_selector(self, selector: BTreeMap<String, String>) -> Self {
        self.mutate(|def| {
            non_empty_map(KIND, "machineConfigPoolSelector", &selector)?;
            def.spec.machine_config_pool_selector = selector;
            Ok(())
        })
    }

    pub fn with_net(self, user_level_networking: bool, devices: Vec<Device>) -> Self {
        self.mutate(|def| {
            let unnamed = devices.iter().any(|d| {
                d.interface_name.is_none() && d.vendor_id.is_none() && d.device_id.is_none()
            });
            if unnamed {
                return Err(format!(
                    "{} 'net.devices' entries must set an interface name, vendor or device id",
                    KIND
                ));
            }

            def.spec.net = Some(Net {
                user_level_networking: Some(user_level_networking),
                devices,
            });
            Ok(())
        })
    }

    pub fn with_rt_kernel(self) -> Self {
        self.mutate(|def| {
            def.spec.real_time_kernel = Some(RealTimeKernel {
                enabled: Some(true),
            });
            Ok(())
        })
    }

    /// CPU frequencies in kHz applied to the isolated and reserved sets.
    pub fn with_global_hardware_tuning(self, isolated_cpu_freq: i64, reserved_cpu_freq: i64) -> Self {
        self.mutate(|def| {
            if isolated_cpu_freq <= 0 || reserved_cpu_freq <= 0 {
                return Err(format!(
                    "{} 'hardwareTuning' frequencies must be greater than 0",
                    KIND
                ));
            }

            def.spec.hardware_tuning = Some(HardwareTuning {
                isolated_cpu_freq: Some(isolated_cpu_freq),
                reserved_cpu_freq: Some(reserved_cpu_freq),
            });
            Ok(())
        })
    }

    pub fn with_workload_hints(self, real_time: bool, high_power: bool, per_pod_power: bool) -> Self {
        self.mutate(|def| {
            if high_power && per_pod_power {
                return Err(format!(
                    "{} 'workloadHints' cannot enable both highPowerConsumption and perPodPowerManagement",
                    KIND
                ));
            }

            def.spec.work_load_hints = Some(WorkloadHints {
                real_time: Some(real_time),
                high_power_consumption: Some(high_power),
                per_pod_power_management: Some(per_pod_power),
            });
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, name: &str) -> Result<PerformanceProfileBuilder> {
    Builder::pull(client, name, None).await
}

pub async fn list(client: &ApiClient, options: &[ListOptions]) -> Result<Vec<PerformanceProfileBuilder>> {
    list_builders(client, None, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::fake::{FakeClient, Verb};
    use crate::shared::error::KubeError;

    fn worker_selector() -> BTreeMap<String, String> {
        BTreeMap::from([(
            "node-role.kubernetes.io/worker-cnf".to_string(),
            String::new(),
        )])
    }

    fn base(api: &ApiClient) -> PerformanceProfileBuilder {
        PerformanceProfileBuilder::new(api, "default", "2-27,30-55", "0-1,28-29", worker_selector())
    }

    #[test]
    fn test_new_validation() {
        let (_, api) = FakeClient::new().into_shared();

        let builder = base(&api);
        assert!(builder.error_msg().is_none());
        assert_eq!(builder.namespace(), None);

        let builder = PerformanceProfileBuilder::new(&api, "p", "", "0-1", worker_selector());
        assert_eq!(builder.error_msg(), Some("performanceProfile 'isolated' cannot be empty"));
    }

    #[test]
    fn test_hugepages() {
        let (_, api) = FakeClient::new().into_shared();
        let page = |size: &str, count| HugePage {
            size: size.to_string(),
            count,
            node: None,
        };

        let builder = base(&api).with_hugepages("1G", vec![page("1G", 4), page("2M", 128)]);
        assert!(builder.error_msg().is_none());
        assert_eq!(builder.definition.spec.hugepages.unwrap().pages.len(), 2);

        assert!(base(&api).with_hugepages("4K", vec![page("2M", 1)]).error_msg().is_some());
        assert!(base(&api).with_hugepages("2M", vec![page("3M", 1)]).error_msg().is_some());
        assert!(base(&api).with_hugepages("2M", vec![]).error_msg().is_some());
    }

    #[test]
    fn test_numa_topology() {
        let (_, api) = FakeClient::new().into_shared();

        let builder = base(&api).with_numa_topology("restricted");
        assert_eq!(
            builder.definition.spec.numa.and_then(|n| n.topology_policy).as_deref(),
            Some("restricted")
        );
        assert!(base(&api).with_numa_topology("none").error_msg().is_some());
    }

    #[test]
    fn test_workload_hints_conflict() {
        let (_, api) = FakeClient::new().into_shared();
        assert!(base(&api).with_workload_hints(true, true, true).error_msg().is_some());
        assert!(base(&api).with_workload_hints(true, true, false).error_msg().is_none());
    }

    #[tokio::test]
    async fn test_force_update_recreates_profile() {
        let (fake, api) = FakeClient::new().into_shared();

        let mut builder = base(&api);
        builder.create().await.unwrap();

        fake.fail_next(Verb::Update, KubeError::KubeError("spec.cpu is immutable".to_string()));

        let mut builder = builder.with_numa_topology("single-numa-node");
        builder.update(true).await.unwrap();

        assert_eq!(fake.calls(Verb::Delete), 1);
        assert_eq!(fake.calls(Verb::Create), 2);

        let stored = fake.stored::<PerformanceProfile>("default", None).unwrap();
        assert_eq!(
            stored.spec.numa.and_then(|n| n.topology_policy).as_deref(),
            Some("single-numa-node")
        );
    }

    #[tokio::test]
    async fn test_update_without_force_surfaces_error() {
        let (fake, api) = FakeClient::new().into_shared();

        let mut builder = base(&api);
        builder.create().await.unwrap();
        fake.fail_next(Verb::Update, KubeError::KubeError("spec.cpu is immutable".to_string()));

        let err = builder.update(false).await.unwrap_err();
        assert_eq!(err.to_string(), "Kubernetes API error: spec.cpu is immutable");
        assert_eq!(fake.calls(Verb::Delete), 0);
    }
}
