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

use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{ResourceQuota, ResourceQuotaSpec};
use tracing::debug;

pub type ResourceQuotaBuilder = Builder<ResourceQuota>;

impl Kind for ResourceQuota {
    const KIND_NAME: &'static str = "resourceQuota";
    const NAMESPACED: bool = true;
}

impl Builder<ResourceQuota> {
    pub fn new(client: &ApiClient, name: &str, namespace: &str) -> Self {
        debug!(name, namespace, "Initializing new ResourceQuota structure");

        Self::skeleton(client, name, Some(namespace))
    }

    /// Replaces the quota spec; at least one hard limit is required.
    pub fn with_quota_spec(self, spec: ResourceQuotaSpec) -> Self {
        self.mutate(|def| {
            if spec.hard.as_ref().map_or(true, |hard| hard.is_empty()) {
                return Err(format!(
                    "{} 'spec.hard' cannot be empty",
                    ResourceQuota::KIND_NAME
                ));
            }

            def.spec = Some(spec);
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<ResourceQuotaBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<ResourceQuotaBuilder>> {
    list_builders(client, Some(namespace), options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::fake::FakeClient;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn spec() -> ResourceQuotaSpec {
        ResourceQuotaSpec {
            hard: Some(BTreeMap::from([
                ("pods".to_string(), Quantity("10".to_string())),
                ("requests.cpu".to_string(), Quantity("4".to_string())),
            ])),
            ..Default::default()
        }
    }

    #[test]
    fn test_quota_spec_requires_hard_limits() {
        let (_, api) = FakeClient::new().into_shared();

        let builder = ResourceQuotaBuilder::new(&api, "quota", "ns").with_quota_spec(ResourceQuotaSpec::default());
        assert_eq!(builder.error_msg(), Some("resourceQuota 'spec.hard' cannot be empty"));
        assert!(builder.definition.spec.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle() {
        let (fake, api) = FakeClient::new().into_shared();

        let mut builder = ResourceQuotaBuilder::new(&api, "quota", "ns").with_quota_spec(spec());
        builder.create().await.unwrap();

        let pulled = pull(&api, "quota", "ns").await.unwrap();
        assert_eq!(pulled.definition.spec, Some(spec()));
        assert_eq!(list(&api, "ns", &[]).await.unwrap().len(), 1);

        builder.delete_and_wait(Duration::from_secs(3)).await.unwrap();
        assert!(fake.stored::<ResourceQuota>("quota", Some("ns")).is_none());
    }
}
