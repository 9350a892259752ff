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

//! Topology Aware Lifecycle Manager cluster group upgrades.

use crate::domain::api::ran::{ClusterGroupUpgrade, ClusterGroupUpgradeSpec, RemediationStrategy};
use crate::domain::condition::Condition;
use crate::infrastructure::constants::{CGU_SUCCEEDED, CONDITION_TRUE};
use crate::infrastructure::kubernetes::builder::validation::{non_empty, non_empty_map};
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub type CguBuilder = Builder<ClusterGroupUpgrade>;

const KIND: &str = ClusterGroupUpgrade::KIND_NAME;

impl Kind for ClusterGroupUpgrade {
    const KIND_NAME: &'static str = "clusterGroupUpgrade";
    const NAMESPACED: bool = true;
}

impl HasConditions for ClusterGroupUpgrade {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl Builder<ClusterGroupUpgrade> {
    pub fn new(client: &ApiClient, name: &str, namespace: &str, max_concurrency: i32) -> Self {
        debug!(name, namespace, max_concurrency, "Initializing new CGU structure");

        let mut builder = Self::skeleton(client, name, Some(namespace));
        builder.definition.spec = ClusterGroupUpgradeSpec {
            remediation_strategy: RemediationStrategy {
                max_concurrency,
                ..Default::default()
            },
            ..Default::default()
        };

        if max_concurrency < 1 {
            builder.set_error(format!(
                "{} 'maxConcurrency' must be at least 1, got {}",
                KIND, max_concurrency
            ));
        }

        builder
    }

    pub fn with_cluster(self, cluster: &str) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "clusters", cluster)?;
            def.spec.clusters.push(cluster.to_string());
            Ok(())
        })
    }

    pub fn with_managed_policy(self, policy: &str) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "managedPolicies", policy)?;
            def.spec.managed_policies.push(policy.to_string());
            Ok(())
        })
    }

    /// Canaries are upgraded first, ahead of the regular batches.
    pub fn with_canary(self, cluster: &str) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "canaries", cluster)?;
            def.spec.remediation_strategy.canaries.push(cluster.to_string());
            Ok(())
        })
    }

    pub fn with_cluster_label_selectors(self, labels: BTreeMap<String, String>) -> Self {
        self.mutate(|def| {
            non_empty_map(KIND, "clusterLabelSelectors", &labels)?;
            def.spec.cluster_label_selectors.push(LabelSelector {
                match_labels: Some(labels),
                ..Default::default()
            });
            Ok(())
        })
    }

    /// Overall remediation timeout in minutes.
    pub fn with_timeout(self, minutes: i32) -> Self {
        self.mutate(|def| {
            if minutes < 1 {
                return Err(format!(
                    "{} 'timeout' must be at least 1 minute, got {}",
                    KIND, minutes
                ));
            }

            def.spec.remediation_strategy.timeout = minutes;
            Ok(())
        })
    }

    pub fn with_enable(self, enable: bool) -> Self {
        self.mutate(|def| {
            def.spec.enable = Some(enable);
            Ok(())
        })
    }

    /// Waits for the `Succeeded` condition to become true.
    pub async fn wait_until_complete(&mut self, timeout: Duration) -> Result<&mut Self> {
        self.wait_for_condition(&Condition::new(CGU_SUCCEEDED, CONDITION_TRUE), timeout)
            .await
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<CguBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<CguBuilder>> {
    list_builders(client, Some(namespace), options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::ran::ClusterGroupUpgradeStatus;
    use crate::infrastructure::kubernetes::fake::FakeClient;

    #[test]
    fn test_composition() {
        let (_, api) = FakeClient::new().into_shared();

        let builder = CguBuilder::new(&api, "cgu", "ztp-install", 2)
            .with_cluster("spoke1")
            .with_cluster("spoke2")
            .with_canary("spoke1")
            .with_managed_policy("du-upgrade")
            .with_timeout(240)
            .with_cluster_label_selectors(BTreeMap::from([("common".to_string(), "true".to_string())]));

        assert!(builder.error_msg().is_none());
        let spec = &builder.definition.spec;
        assert_eq!(spec.clusters, vec!["spoke1", "spoke2"]);
        assert_eq!(spec.remediation_strategy.canaries, vec!["spoke1"]);
        assert_eq!(spec.remediation_strategy.max_concurrency, 2);
        assert_eq!(spec.remediation_strategy.timeout, 240);
        assert_eq!(spec.cluster_label_selectors.len(), 1);
    }

    #[test]
    fn test_rejections() {
        let (_, api) = FakeClient::new().into_shared();

        assert!(CguBuilder::new(&api, "cgu", "ztp-install", 0).error_msg().is_some());

        let builder = CguBuilder::new(&api, "cgu", "ztp-install", 1)
            .with_timeout(0)
            .with_cluster("spoke1");
        assert_eq!(
            builder.error_msg(),
            Some("clusterGroupUpgrade 'timeout' must be at least 1 minute, got 0")
        );
        assert!(builder.definition.spec.clusters.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_complete() {
        let (fake, api) = FakeClient::new().into_shared();

        let mut builder = CguBuilder::new(&api, "cgu", "ztp-install", 1).with_cluster("spoke1");
        builder.create().await.unwrap();

        assert!(builder
            .wait_until_complete(Duration::from_secs(6))
            .await
            .unwrap_err()
            .is_timeout());

        let mut done = fake.stored::<ClusterGroupUpgrade>("cgu", Some("ztp-install")).unwrap();
        done.status = Some(ClusterGroupUpgradeStatus {
            conditions: vec![Condition::new(CGU_SUCCEEDED, CONDITION_TRUE).with_reason("Completed")],
            ..Default::default()
        });
        fake.put(done);

        builder.wait_until_complete(Duration::from_secs(6)).await.unwrap();
        builder.delete_and_wait(Duration::from_secs(6)).await.unwrap();
        assert_eq!(fake.count::<ClusterGroupUpgrade>(), 0);
    }
}
