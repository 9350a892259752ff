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

use super::*;
use crate::domain::api::oran::{ClusterTemplate, ClusterTemplateStatus};
use crate::domain::api::sriov::SriovNetwork;
use crate::infrastructure::kubernetes::fake::{FakeClient, Verb};
use std::sync::Arc;

type NetworkBuilder = Builder<SriovNetwork>;

fn network(api: &ApiClient) -> NetworkBuilder {
    NetworkBuilder::new(api, "sriovnet", "testnamespace", "targetns", "resname")
}

fn template(conditions: Vec<Condition>) -> ClusterTemplate {
    let mut template = ClusterTemplate::new("tpl", Default::default());
    template.metadata.namespace = Some("tpl-ns".to_string());
    template.status = Some(ClusterTemplateStatus { conditions });
    template
}

fn shared() -> (Arc<FakeClient>, ApiClient) {
    FakeClient::new().into_shared()
}

#[tokio::test]
async fn test_invalid_builder_never_calls_transport() {
    let (fake, api) = shared();
    let mut builder = network(&api).with_vlan(4095).with_vlan(10);

    assert!(builder.validate().is_err());
    assert!(builder.get().await.is_err());
    assert!(!builder.exists().await);
    assert!(builder.create().await.is_err());
    assert!(builder.update(false).await.is_err());
    assert!(builder.update(true).await.is_err());
    assert!(builder.delete().await.is_err());
    assert!(builder.wait_until_deleted(Duration::from_secs(1)).await.is_err());

    assert_eq!(fake.total_calls(), 0);
    assert_eq!(builder.definition.spec.vlan, 0);
}

#[test]
fn test_validate_is_read_only() {
    let (_, api) = shared();
    let builder = network(&api).with_vlan(5000);
    let before = builder.error_msg().map(str::to_string);

    let err = builder.validate().unwrap_err();
    assert_eq!(Some(err.to_string()), before);
    assert_eq!(builder.error_msg().map(str::to_string), before);
}

#[test]
fn test_first_error_wins() {
    let (_, api) = shared();
    let mut builder = network(&api).with_vlan(5000);
    builder.set_error("later");

    assert_eq!(
        builder.error_msg(),
        Some("sriovNetwork 'vlan' must be between 0 and 4094, got 5000")
    );
}

#[test]
fn test_skeleton_identity_errors() {
    let (_, api) = shared();

    let builder = Builder::<SriovNetwork>::skeleton(&api, "", Some("ns"));
    assert_eq!(builder.error_msg(), Some("sriovNetwork 'name' cannot be empty"));

    let builder = Builder::<SriovNetwork>::skeleton(&api, "net", None);
    assert_eq!(builder.error_msg(), Some("sriovNetwork 'namespace' cannot be empty"));
}

#[tokio::test]
async fn test_pull_missing_object() {
    let (_, api) = shared();

    let err = Builder::<SriovNetwork>::pull(&api, "missing", Some("ns")).await.unwrap_err();
    assert_eq!(err.to_string(), "sriovNetwork object missing does not exist in namespace ns");

    let err = Builder::<SriovNetwork>::pull(&api, "", Some("ns")).await.unwrap_err();
    assert_eq!(err.to_string(), "sriovNetwork 'name' cannot be empty");
}

#[tokio::test]
async fn test_pull_resets_definition_to_observed() {
    let (fake, api) = shared();
    network(&api).with_vlan(7).create().await.unwrap();

    let builder = Builder::<SriovNetwork>::pull(&api, "sriovnet", Some("testnamespace"))
        .await
        .unwrap();

    assert_eq!(builder.definition.spec.vlan, 7);
    assert_eq!(builder.object.as_ref(), Some(&builder.definition));
    assert_eq!(builder.definition.metadata.resource_version.as_deref(), Some("1"));
    assert_eq!(fake.calls(Verb::Get), 2);
}

#[tokio::test]
async fn test_pull_surfaces_transport_error() {
    let (fake, api) = shared();
    network(&api).with_vlan(42).create().await.unwrap();
    fake.fail_next(Verb::Get, KubeError::KubeError("connection reset".to_string()));

    let err = Builder::<SriovNetwork>::pull(&api, "sriovnet", Some("testnamespace"))
        .await
        .unwrap_err();
    assert!(matches!(err, KubeError::KubeError(_)));
    assert_eq!(err.to_string(), "Kubernetes API error: connection reset");

    let mut builder = Builder::<SriovNetwork>::pull(&api, "sriovnet", Some("testnamespace"))
        .await
        .unwrap()
        .with_trust(true);
    assert_eq!(builder.definition.spec.vlan, 42);
    builder.update(false).await.unwrap();

    let stored = fake.stored::<SriovNetwork>("sriovnet", Some("testnamespace")).unwrap();
    assert_eq!(stored.spec.vlan, 42);
    assert_eq!(stored.spec.resource_name, "resname");
}

#[tokio::test]
async fn test_create_is_idempotent() {
    let (fake, api) = shared();
    let mut builder = network(&api);

    builder.create().await.unwrap();
    assert_eq!(builder.object.as_ref(), Some(&builder.definition));

    builder.create().await.unwrap();
    assert_eq!(fake.calls(Verb::Create), 1);
    assert_eq!(
        builder.object.as_ref().map(|o| &o.spec),
        Some(&builder.definition.spec)
    );
}

#[tokio::test]
async fn test_create_surfaces_transport_error() {
    let (fake, api) = shared();
    fake.fail_next(Verb::Create, KubeError::KubeError("admission webhook denied".to_string()));

    let mut builder = network(&api);
    let err = builder.create().await.unwrap_err();

    assert_eq!(err.to_string(), "Kubernetes API error: admission webhook denied");
    assert!(builder.object.is_none());
}

#[tokio::test]
async fn test_exists_assumes_present_on_other_errors() {
    let (fake, api) = shared();
    let mut builder = network(&api);

    assert!(!builder.exists().await);

    fake.fail_next(Verb::Get, KubeError::KubeError("connection reset".to_string()));
    assert!(builder.exists().await);
    assert!(builder.object.is_none());
}

#[tokio::test]
async fn test_delete_absent_is_noop() {
    let (fake, api) = shared();
    let mut builder = network(&api);

    builder.delete().await.unwrap();
    assert!(builder.object.is_none());
    assert_eq!(fake.calls(Verb::Delete), 0);

    builder.create().await.unwrap();
    builder.delete().await.unwrap();
    assert!(builder.object.is_none());
    assert!(!builder.exists().await);
    assert_eq!(builder.definition.spec.resource_name, "resname");
}

#[tokio::test]
async fn test_update_non_existent() {
    let (fake, api) = shared();

    let err = network(&api).update(false).await.unwrap_err();
    assert_eq!(err.to_string(), "cannot update non-existent sriovNetwork");
    assert_eq!(fake.calls(Verb::Update), 0);
}

#[tokio::test]
async fn test_update_round_trip() {
    let (fake, api) = shared();
    network(&api).create().await.unwrap();

    let mut builder = Builder::<SriovNetwork>::pull(&api, "sriovnet", Some("testnamespace"))
        .await
        .unwrap()
        .with_vlan(42)
        .with_trust(true);
    builder.update(false).await.unwrap();

    let stored = fake.stored::<SriovNetwork>("sriovnet", Some("testnamespace")).unwrap();
    assert_eq!(stored.spec, builder.definition.spec);
    assert_eq!(stored.metadata.resource_version.as_deref(), Some("2"));
    assert_eq!(builder.object.as_ref(), Some(&builder.definition));
}

#[tokio::test]
async fn test_force_update_recreates() {
    let (fake, api) = shared();
    network(&api).create().await.unwrap();
    fake.fail_next(Verb::Update, KubeError::Conflict("field is immutable".to_string()));

    let mut builder = network(&api).with_vlan(99);
    builder.update(true).await.unwrap();

    assert_eq!(fake.calls(Verb::Delete), 1);
    assert_eq!(fake.calls(Verb::Create), 2);
    let stored = fake.stored::<SriovNetwork>("sriovnet", Some("testnamespace")).unwrap();
    assert_eq!(stored.spec.vlan, 99);
    assert_eq!(stored.metadata.resource_version.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_force_update_returns_delete_error_unchanged() {
    let (fake, api) = shared();
    network(&api).create().await.unwrap();
    fake.fail_next(Verb::Update, KubeError::Conflict("field is immutable".to_string()));
    fake.fail_next(Verb::Delete, KubeError::KubeError("etcd unavailable".to_string()));

    let err = network(&api).with_vlan(99).update(true).await.unwrap_err();
    assert!(matches!(err, KubeError::KubeError(_)));
    assert_eq!(err.to_string(), "Kubernetes API error: etcd unavailable");
    assert_eq!(fake.calls(Verb::Create), 1);
}

#[tokio::test]
async fn test_update_without_force_returns_error() {
    let (fake, api) = shared();
    network(&api).create().await.unwrap();
    fake.fail_next(Verb::Update, KubeError::Conflict("field is immutable".to_string()));

    let err = network(&api).with_vlan(99).update(false).await.unwrap_err();
    assert_eq!(err.to_string(), "Conflict: field is immutable");
    assert_eq!(fake.calls(Verb::Delete), 0);
}

#[test]
fn test_with_options() {
    let (_, api) = shared();

    let options: Vec<BuilderOption<SriovNetwork>> = vec![
        Box::new(|b: &mut NetworkBuilder| -> Result<()> {
            b.definition.spec.vlan = 12;
            Ok(())
        }),
        Box::new(|_: &mut NetworkBuilder| -> Result<()> {
            Err(KubeError::InvalidArgument("bad option".to_string()))
        }),
        Box::new(|b: &mut NetworkBuilder| -> Result<()> {
            b.definition.spec.vlan = 13;
            Ok(())
        }),
    ];

    let builder = network(&api).with_options(options);

    assert_eq!(builder.definition.spec.vlan, 12);
    assert_eq!(builder.error_msg(), Some("error occurred in mutation function: bad option"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_condition_match_by_example() {
    let observed = Condition::new("ClusterTemplateValidated", "True")
        .with_reason("Completed")
        .with_message("The cluster template validation succeeded");
    let (_, api) = FakeClient::new().with_object(template(vec![observed])).into_shared();

    let mut builder = Builder::<ClusterTemplate>::skeleton(&api, "tpl", Some("tpl-ns"));
    let expected = Condition::new("ClusterTemplateValidated", "True").with_message("validation succeeded");
    builder
        .wait_for_condition(&expected, Duration::from_secs(1))
        .await
        .unwrap();

    assert!(builder.object.is_some());
    assert_eq!(builder.object.as_ref(), Some(&builder.definition));

    let wrong = Condition::new("ClusterTemplateValidated", "True").with_reason("Failed");
    let err = builder
        .wait_for_condition(&wrong, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_condition_swallows_transient_errors() {
    let validated = Condition::new("ClusterTemplateValidated", "True");
    let (fake, api) = FakeClient::new().with_object(template(vec![validated.clone()])).into_shared();

    let mut builder = Builder::<ClusterTemplate>::skeleton(&api, "tpl", Some("tpl-ns"));
    assert!(builder.exists().await);

    fake.fail_next(Verb::Get, KubeError::KubeError("etcd leader changed".to_string()));
    fake.fail_next(Verb::Get, KubeError::KubeError("etcd leader changed".to_string()));

    builder
        .wait_for_condition(&validated, Duration::from_secs(10))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wait_for_non_existent() {
    let (_, api) = shared();

    let mut builder = Builder::<ClusterTemplate>::skeleton(&api, "tpl", Some("tpl-ns"));
    let err = builder
        .wait_for_condition(&Condition::new("Ready", "True"), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "cannot wait for non-existent clusterTemplate");
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_deleted() {
    let (fake, api) = shared();
    let builder = network(&api);

    builder.wait_until_deleted(Duration::from_secs(1)).await.unwrap();

    let mut builder = network(&api);
    builder.create().await.unwrap();
    let err = builder.wait_until_deleted(Duration::from_secs(3)).await.unwrap_err();
    assert!(err.is_timeout());

    fake.remove::<SriovNetwork>("sriovnet", Some("testnamespace"));
    builder.wait_until_deleted(Duration::from_secs(3)).await.unwrap();
}

#[tokio::test]
async fn test_unregistered_kind_is_rejected_by_transport() {
    let (_, api) = shared();
    let resource = Builder::<SriovNetwork>::api_resource();

    let err = api
        .get(&resource, &ObjectKey::namespaced("net", "ns"))
        .await
        .unwrap_err();
    assert!(matches!(err, KubeError::ConfigError(_)));
}
