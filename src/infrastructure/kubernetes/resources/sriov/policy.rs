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

use crate::domain::api::sriov::{
    SriovNetworkNicSelector, SriovNetworkNodePolicy, SriovNetworkNodePolicySpec,
};
use crate::infrastructure::constants::{MTU_MAX, MTU_MIN, SRIOV_DEVICE_TYPES, VF_INDEX_MAX};
use crate::infrastructure::kubernetes::builder::validation::{
    in_range, non_empty, non_empty_list, non_empty_map, one_of,
};
use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{clean_all as clean_all_kind, list_builders, ListOptions};
use crate::shared::error::Result;
use std::collections::BTreeMap;
use tracing::debug;

pub type PolicyBuilder = Builder<SriovNetworkNodePolicy>;

const KIND: &str = SriovNetworkNodePolicy::KIND_NAME;

impl Kind for SriovNetworkNodePolicy {
    const KIND_NAME: &'static str = "sriovNetworkNodePolicy";
    const NAMESPACED: bool = true;
}

/// `<pf>#<first>-<last>` form consumed by the config daemon.
fn partition(pf_name: &str, first: u32, last: u32) -> String {
    let pf = pf_name.split('#').next().unwrap_or(pf_name);
    format!("{}#{}-{}", pf, first, last)
}

impl Builder<SriovNetworkNodePolicy> {
    pub fn new(
        client: &ApiClient,
        name: &str,
        namespace: &str,
        resource_name: &str,
        num_vfs: u32,
        pf_names: &[&str],
        node_selector: BTreeMap<String, String>,
    ) -> Self {
        debug!(
            name,
            namespace,
            resource_name,
            num_vfs,
            "Initializing new SriovNetworkNodePolicy structure"
        );

        let mut builder = Self::skeleton(client, name, Some(namespace));
        builder.definition.spec = SriovNetworkNodePolicySpec {
            resource_name: resource_name.to_string(),
            node_selector: node_selector.clone(),
            num_vfs,
            nic_selector: SriovNetworkNicSelector {
                pf_names: pf_names.iter().map(|pf| pf.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        };

        let checks = non_empty(KIND, "resourceName", resource_name)
            .and_then(|_| non_empty_list(KIND, "pfNames", pf_names))
            .and_then(|_| non_empty_map(KIND, "nodeSelector", &node_selector))
            .and_then(|_| {
                if num_vfs == 0 {
                    Err(format!("{} 'numVfs' must be greater than 0", KIND))
                } else {
                    Ok(())
                }
            });

        if let Err(msg) = checks {
            builder.set_error(msg);
        }

        builder
    }

    pub fn with_mtu(self, mtu: u16) -> Self {
        self.mutate(|def| {
            in_range(KIND, "mtu", mtu, MTU_MIN, MTU_MAX)?;
            def.spec.mtu = Some(mtu);
            Ok(())
        })
    }

    pub fn with_device_type(self, device_type: &str) -> Self {
        self.mutate(|def| {
            one_of(KIND, "deviceType", device_type, SRIOV_DEVICE_TYPES)?;
            def.spec.device_type = device_type.to_string();
            Ok(())
        })
    }

    /// Restricts every PF to virtual functions `first..=last`.
    pub fn with_vf_range(self, first: u32, last: u32) -> Self {
        self.mutate(|def| {
            in_range(KIND, "lastVF", last, 0, VF_INDEX_MAX)?;
            if first > last {
                return Err(format!(
                    "{} 'firstVF' {} cannot be greater than 'lastVF' {}",
                    KIND, first, last
                ));
            }

            non_empty_list(KIND, "pfNames", &def.spec.nic_selector.pf_names)?;

            def.spec.nic_selector.pf_names = def
                .spec
                .nic_selector
                .pf_names
                .iter()
                .map(|pf| partition(pf, first, last))
                .collect();
            Ok(())
        })
    }

    pub fn with_rdma(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.is_rdma = enabled;
            Ok(())
        })
    }

    pub fn with_vhost_net(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.need_vhost_net = enabled;
            Ok(())
        })
    }

    pub fn with_externally_managed(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.externally_managed = enabled;
            Ok(())
        })
    }

    pub fn with_priority(self, priority: u32) -> Self {
        self.mutate(|def| {
            in_range(KIND, "priority", priority, 0, 99)?;
            def.spec.priority = Some(priority);
            Ok(())
        })
    }

    pub fn with_link_type(self, link_type: &str) -> Self {
        self.mutate(|def| {
            one_of(KIND, "linkType", link_type, &["eth", "ETH", "ib", "IB"])?;
            def.spec.link_type = link_type.to_string();
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<PolicyBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<PolicyBuilder>> {
    list_builders(client, Some(namespace), options).await
}

/// Removes every policy in `namespace` except `default`.
pub async fn clean_all(client: &ApiClient, namespace: &str, options: &[ListOptions]) -> Result<()> {
    clean_all_kind::<SriovNetworkNodePolicy>(client, Some(namespace), options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::fake::FakeClient;

    fn selector() -> BTreeMap<String, String> {
        BTreeMap::from([(
            "node-role.kubernetes.io/worker".to_string(),
            String::new(),
        )])
    }

    fn base(api: &ApiClient) -> PolicyBuilder {
        PolicyBuilder::new(api, "policy", "sriov-ns", "resname", 8, &["ens1f0", "ens1f1"], selector())
    }

    #[test]
    fn test_new_validation() {
        let (_, api) = FakeClient::new().into_shared();

        assert!(base(&api).error_msg().is_none());

        let builder = PolicyBuilder::new(&api, "policy", "sriov-ns", "res", 8, &[], selector());
        assert_eq!(builder.error_msg(), Some("sriovNetworkNodePolicy 'pfNames' cannot be empty"));

        let builder = PolicyBuilder::new(&api, "policy", "sriov-ns", "res", 8, &["ens1f0"], BTreeMap::new());
        assert_eq!(
            builder.error_msg(),
            Some("sriovNetworkNodePolicy 'nodeSelector' cannot be empty")
        );

        let builder = PolicyBuilder::new(&api, "policy", "sriov-ns", "res", 0, &["ens1f0"], selector());
        assert_eq!(
            builder.error_msg(),
            Some("sriovNetworkNodePolicy 'numVfs' must be greater than 0")
        );
    }

    #[test]
    fn test_mtu_bounds() {
        let (_, api) = FakeClient::new().into_shared();

        assert_eq!(base(&api).with_mtu(1).definition.spec.mtu, Some(1));
        assert_eq!(base(&api).with_mtu(9192).definition.spec.mtu, Some(9192));
        assert!(base(&api).with_mtu(0).error_msg().is_some());

        let rejected = base(&api).with_mtu(9193);
        assert!(rejected.error_msg().is_some());
        assert_eq!(rejected.definition.spec.mtu, None);
    }

    #[test]
    fn test_device_type() {
        let (_, api) = FakeClient::new().into_shared();

        assert_eq!(
            base(&api).with_device_type("vfio-pci").definition.spec.device_type,
            "vfio-pci"
        );
        assert!(base(&api).with_device_type("igb_uio").error_msg().is_some());
    }

    #[test]
    fn test_vf_range_partitions_every_pf() {
        let (_, api) = FakeClient::new().into_shared();

        let builder = base(&api).with_vf_range(2, 5);
        assert!(builder.error_msg().is_none());
        assert_eq!(
            builder.definition.spec.nic_selector.pf_names,
            vec!["ens1f0#2-5".to_string(), "ens1f1#2-5".to_string()]
        );

        let builder = builder.with_vf_range(0, 63);
        assert_eq!(builder.definition.spec.nic_selector.pf_names[0], "ens1f0#0-63");
    }

    #[test]
    fn test_vf_range_rejections_leave_pfs_untouched() {
        let (_, api) = FakeClient::new().into_shared();

        let builder = base(&api).with_vf_range(5, 2);
        assert!(builder.error_msg().is_some());
        assert_eq!(builder.definition.spec.nic_selector.pf_names[0], "ens1f0");

        let builder = base(&api).with_vf_range(0, 64);
        assert!(builder.error_msg().is_some());
        assert_eq!(builder.definition.spec.nic_selector.pf_names[1], "ens1f1");
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (fake, api) = FakeClient::new().into_shared();

        let mut builder = base(&api).with_rdma(true).with_mtu(1500);
        builder.create().await.unwrap();
        let first = builder.object.clone();
        builder.create().await.unwrap();

        assert_eq!(fake.count::<SriovNetworkNodePolicy>(), 1);
        assert_eq!(
            first.map(|o| o.spec),
            builder.object.as_ref().map(|o| o.spec.clone())
        );
    }
}
