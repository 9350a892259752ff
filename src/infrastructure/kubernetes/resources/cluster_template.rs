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

use crate::domain::api::oran::ClusterTemplate;
use crate::domain::condition::Condition;
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;

pub type ClusterTemplateBuilder = Builder<ClusterTemplate>;

impl Kind for ClusterTemplate {
    const KIND_NAME: &'static str = "clusterTemplate";
    const NAMESPACED: bool = true;
}

impl HasConditions for ClusterTemplate {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

/// Cluster templates are authored by the hub operator and only ever pulled.
pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<ClusterTemplateBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<ClusterTemplateBuilder>> {
    list_builders(client, Some(namespace), options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::oran::{ClusterTemplateSpec, ClusterTemplateStatus};
    use crate::infrastructure::constants::{CLUSTER_TEMPLATE_VALIDATED, CONDITION_TRUE};
    use crate::infrastructure::kubernetes::fake::FakeClient;
    use std::time::Duration;

    fn template(name: &str, conditions: Vec<Condition>) -> ClusterTemplate {
        let mut template = ClusterTemplate::new(
            name,
            ClusterTemplateSpec {
                name: "sno-ran-du".to_string(),
                version: "v4-18-0-1".to_string(),
                ..Default::default()
            },
        );
        template.metadata.namespace = Some("sno-ran-du-ns".to_string());
        template.status = Some(ClusterTemplateStatus { conditions });
        template
    }

    #[tokio::test]
    async fn test_pull_and_list() {
        let (_, api) = FakeClient::new()
            .with_object(template("sno-ran-du.v4-18-0-1", vec![]))
            .with_object(template("sno-ran-du.v4-18-0-2", vec![]))
            .into_shared();

        let builder = pull(&api, "sno-ran-du.v4-18-0-1", "sno-ran-du-ns").await.unwrap();
        assert_eq!(builder.definition.spec.version, "v4-18-0-1");

        let err = pull(&api, "missing", "sno-ran-du-ns").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "clusterTemplate object missing does not exist in namespace sno-ran-du-ns"
        );

        assert_eq!(list(&api, "sno-ran-du-ns", &[]).await.unwrap().len(), 2);
        assert!(list(&api, "other", &[]).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_validated_condition() {
        let validated = Condition::new(CLUSTER_TEMPLATE_VALIDATED, CONDITION_TRUE).with_reason("Completed");
        let (_, api) = FakeClient::new()
            .with_object(template("tpl", vec![validated.clone()]))
            .into_shared();

        let mut builder = pull(&api, "tpl", "sno-ran-du-ns").await.unwrap();
        builder
            .wait_for_condition(&Condition::new(CLUSTER_TEMPLATE_VALIDATED, ""), Duration::from_secs(1))
            .await
            .unwrap();
        builder
            .wait_for_condition(&validated, Duration::from_secs(1))
            .await
            .unwrap();
    }
}
