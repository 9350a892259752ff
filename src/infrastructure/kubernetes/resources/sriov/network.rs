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

use crate::domain::api::sriov::{SriovNetwork, SriovNetworkSpec};
use crate::infrastructure::constants::{
    SRIOV_LINK_STATES, SRIOV_LOG_LEVELS, SRIOV_VLAN_PROTOCOLS, VLAN_MAX, VLAN_QOS_MAX,
};
use crate::infrastructure::kubernetes::builder::validation::{in_range, non_empty, one_of};
use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{clean_all as clean_all_kind, list_builders, ListOptions};
use crate::shared::error::Result;
use tracing::debug;

pub type NetworkBuilder = Builder<SriovNetwork>;

impl Kind for SriovNetwork {
    const KIND_NAME: &'static str = "sriovNetwork";
    const NAMESPACED: bool = true;
}

fn on_off(enabled: bool) -> String {
    let value = if enabled { "on" } else { "off" };
    value.to_string()
}

impl Builder<SriovNetwork> {
    /// Network in `namespace` whose attachment definition lands in `target_namespace`.
    pub fn new(
        client: &ApiClient,
        name: &str,
        namespace: &str,
        target_namespace: &str,
        resource_name: &str,
    ) -> Self {
        debug!(
            name,
            namespace,
            target_namespace,
            resource_name,
            "Initializing new SriovNetwork structure"
        );

        let mut builder = Self::skeleton(client, name, Some(namespace));
        builder.definition.spec = SriovNetworkSpec {
            resource_name: resource_name.to_string(),
            network_namespace: target_namespace.to_string(),
            ..Default::default()
        };

        if let Err(msg) = non_empty(SriovNetwork::KIND_NAME, "resourceName", resource_name) {
            builder.set_error(msg);
        }

        builder
    }

    pub fn with_vlan(self, vlan: u16) -> Self {
        self.mutate(|def| {
            in_range(SriovNetwork::KIND_NAME, "vlan", vlan, 0, VLAN_MAX)?;
            def.spec.vlan = vlan;
            Ok(())
        })
    }

    pub fn with_vlan_qos(self, qos: u16) -> Self {
        self.mutate(|def| {
            in_range(SriovNetwork::KIND_NAME, "vlanQoS", qos, 0, VLAN_QOS_MAX)?;
            def.spec.vlan_qos = Some(qos);
            Ok(())
        })
    }

    pub fn with_vlan_proto(self, proto: &str) -> Self {
        self.mutate(|def| {
            one_of(SriovNetwork::KIND_NAME, "vlanProto", proto, SRIOV_VLAN_PROTOCOLS)?;
            def.spec.vlan_proto = proto.to_string();
            Ok(())
        })
    }

    pub fn with_spoof(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.spoof_chk = on_off(enabled);
            Ok(())
        })
    }

    pub fn with_trust(self, enabled: bool) -> Self {
        self.mutate(|def| {
            def.spec.trust = on_off(enabled);
            Ok(())
        })
    }

    pub fn with_link_state(self, state: &str) -> Self {
        self.mutate(|def| {
            one_of(SriovNetwork::KIND_NAME, "linkState", state, SRIOV_LINK_STATES)?;
            def.spec.link_state = state.to_string();
            Ok(())
        })
    }

    pub fn with_max_tx_rate(self, rate: u32) -> Self {
        self.mutate(|def| {
            def.spec.max_tx_rate = Some(rate);
            Ok(())
        })
    }

    pub fn with_min_tx_rate(self, rate: u32) -> Self {
        self.mutate(|def| {
            def.spec.min_tx_rate = Some(rate);
            Ok(())
        })
    }

    /// Raw IPAM JSON handed to the CNI plugin.
    pub fn with_ipam(self, ipam: &str) -> Self {
        self.mutate(|def| {
            non_empty(SriovNetwork::KIND_NAME, "ipam", ipam)?;
            serde_json::from_str::<serde_json::Value>(ipam).map_err(|e| {
                format!("{} 'ipam' is not valid JSON: {}", SriovNetwork::KIND_NAME, e)
            })?;
            def.spec.ipam = ipam.to_string();
            Ok(())
        })
    }

    pub fn with_log_level(self, level: &str) -> Self {
        self.mutate(|def| {
            one_of(SriovNetwork::KIND_NAME, "logLevel", level, SRIOV_LOG_LEVELS)?;
            def.spec.log_level = level.to_string();
            Ok(())
        })
    }

    pub fn with_log_file(self, path: &str) -> Self {
        self.mutate(|def| {
            non_empty(SriovNetwork::KIND_NAME, "logFile", path)?;
            def.spec.log_file = path.to_string();
            Ok(())
        })
    }

    pub fn with_meta_plugins(self, plugins: &str) -> Self {
        self.mutate(|def| {
            non_empty(SriovNetwork::KIND_NAME, "metaPlugins", plugins)?;
            def.spec.meta_plugins = plugins.to_string();
            Ok(())
        })
    }

    pub fn with_capabilities(self, capabilities: &str) -> Self {
        self.mutate(|def| {
            non_empty(SriovNetwork::KIND_NAME, "capabilities", capabilities)?;
            def.spec.capabilities = capabilities.to_string();
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<NetworkBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<NetworkBuilder>> {
    list_builders(client, Some(namespace), options).await
}

pub async fn clean_all(client: &ApiClient, namespace: &str, options: &[ListOptions]) -> Result<()> {
    clean_all_kind::<SriovNetwork>(client, Some(namespace), options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::fake::{FakeClient, Verb};
    use std::sync::Arc;

    fn client() -> (Arc<FakeClient>, ApiClient) {
        FakeClient::new().into_shared()
    }

    #[test]
    fn test_new_sets_identity() {
        let (_, api) = client();
        let builder = NetworkBuilder::new(&api, "sriovnet", "testnamespace", "targetns", "resname");

        assert!(builder.error_msg().is_none());
        assert_eq!(builder.name(), "sriovnet");
        assert_eq!(builder.namespace(), Some("testnamespace"));
        assert_eq!(builder.definition.spec.network_namespace, "targetns");
        assert_eq!(builder.definition.spec.resource_name, "resname");
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        let (_, api) = client();

        let builder = NetworkBuilder::new(&api, "", "ns", "targetns", "resname");
        assert_eq!(builder.error_msg(), Some("sriovNetwork 'name' cannot be empty"));

        let builder = NetworkBuilder::new(&api, "net", "", "targetns", "resname");
        assert_eq!(builder.error_msg(), Some("sriovNetwork 'namespace' cannot be empty"));

        let builder = NetworkBuilder::new(&api, "net", "ns", "targetns", "");
        assert_eq!(builder.error_msg(), Some("sriovNetwork 'resourceName' cannot be empty"));
    }

    #[test]
    fn test_vlan_bounds() {
        let (_, api) = client();
        let base = || NetworkBuilder::new(&api, "net", "ns", "targetns", "res");

        assert_eq!(base().with_vlan(0).definition.spec.vlan, 0);
        assert_eq!(base().with_vlan(4094).definition.spec.vlan, 4094);

        let rejected = base().with_vlan(100).with_vlan(4095);
        assert_eq!(
            rejected.error_msg(),
            Some("sriovNetwork 'vlan' must be between 0 and 4094, got 4095")
        );
        assert_eq!(rejected.definition.spec.vlan, 100);
    }

    #[test]
    fn test_vlan_qos_bounds() {
        let (_, api) = client();
        let base = || NetworkBuilder::new(&api, "net", "ns", "targetns", "res");

        assert_eq!(base().with_vlan_qos(7).definition.spec.vlan_qos, Some(7));
        let rejected = base().with_vlan_qos(8);
        assert!(rejected.error_msg().is_some());
        assert_eq!(rejected.definition.spec.vlan_qos, None);
    }

    #[test]
    fn test_first_error_wins() {
        let (_, api) = client();
        let builder = NetworkBuilder::new(&api, "net", "ns", "targetns", "res")
            .with_vlan_proto("802.1x")
            .with_link_state("up")
            .with_trust(true);

        assert!(builder
            .error_msg()
            .is_some_and(|msg| msg.starts_with("sriovNetwork 'vlanProto' must be one of")));
        assert!(builder.definition.spec.trust.is_empty());
    }

    #[test]
    fn test_string_setters() {
        let (_, api) = client();
        let builder = NetworkBuilder::new(&api, "net", "ns", "targetns", "res")
            .with_spoof(false)
            .with_trust(true)
            .with_link_state("enable")
            .with_vlan_proto("802.1ad")
            .with_ipam(r#"{"type":"host-local"}"#)
            .with_log_level("debug")
            .with_meta_plugins(r#"{"type":"tuning"}"#)
            .with_max_tx_rate(100)
            .with_min_tx_rate(10);

        assert!(builder.error_msg().is_none());
        let spec = &builder.definition.spec;
        assert_eq!(spec.spoof_chk, "off");
        assert_eq!(spec.trust, "on");
        assert_eq!(spec.link_state, "enable");
        assert_eq!(spec.log_level, "debug");
        assert_eq!(spec.max_tx_rate, Some(100));
        assert_eq!(spec.min_tx_rate, Some(10));
    }

    #[test]
    fn test_ipam_must_be_json() {
        let (_, api) = client();
        let builder = NetworkBuilder::new(&api, "net", "ns", "targetns", "res").with_ipam("{");
        assert!(builder.error_msg().is_some_and(|m| m.contains("'ipam' is not valid JSON")));
    }

    #[tokio::test]
    async fn test_create_pull_and_delete() {
        let (fake, api) = client();

        let mut builder = NetworkBuilder::new(&api, "sriovnet", "testnamespace", "targetns", "resname")
            .with_vlan(100);
        builder.create().await.unwrap();
        assert_eq!(fake.calls(Verb::Create), 1);

        let pulled = pull(&api, "sriovnet", "testnamespace").await.unwrap();
        let object = pulled.object.as_ref().unwrap();
        assert_eq!(object.metadata.name.as_deref(), Some("sriovnet"));
        assert_eq!(object.spec.resource_name, "resname");
        assert_eq!(object.spec.vlan, 100);

        builder.delete().await.unwrap();
        assert!(builder.object.is_none());
        assert!(fake.stored::<SriovNetwork>("sriovnet", Some("testnamespace")).is_none());
    }

    #[tokio::test]
    async fn test_invalid_builder_never_reaches_transport() {
        let (fake, api) = client();

        let mut builder = NetworkBuilder::new(&api, "net", "ns", "targetns", "res").with_vlan(5000);
        assert!(builder.create().await.is_err());
        assert!(builder.delete().await.is_err());
        assert!(builder.update(true).await.is_err());
        assert!(!builder.exists().await);
        assert_eq!(fake.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_list_and_clean_all() {
        let (fake, api) = client();
        for name in ["default", "net1", "net2"] {
            NetworkBuilder::new(&api, name, "ns", "targetns", "res")
                .create()
                .await
                .unwrap();
        }

        assert_eq!(list(&api, "ns", &[]).await.unwrap().len(), 3);
        assert!(list(&api, "", &[]).await.is_err());

        clean_all(&api, "ns", &[]).await.unwrap();
        assert_eq!(fake.count::<SriovNetwork>(), 1);
        assert!(fake.stored::<SriovNetwork>("default", Some("ns")).is_some());
    }
}
