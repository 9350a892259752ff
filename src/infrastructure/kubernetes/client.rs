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

use crate::domain::config::ClientConfig;
use crate::infrastructure::constants::DEFAULT_FIELD_MANAGER;
use crate::infrastructure::kubernetes::list::ListOptions;
use crate::infrastructure::kubernetes::scheme::{Scheme, SchemeRegistry};
use crate::infrastructure::kubernetes::wait::PollIntervals;
use crate::shared::error::KubeError;
use kube::api::{DeleteParams, PostParams};
use kube::core::{ApiResource, DynamicObject, TypeMeta};
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Shared handle every builder holds.
pub type ApiClient = Arc<dyn ResourceClient>;

/// Address of a cluster object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub name: String,
    pub namespace: Option<String>,
}

impl ObjectKey {
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn namespaced(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    pub fn namespace_or_empty(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Transport to the cluster.
///
/// Payloads cross this boundary as [`DynamicObject`]s so the trait stays
/// object safe; builders convert to and from their typed kinds.
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync {
    async fn get(&self, resource: &ApiResource, key: &ObjectKey) -> Result<DynamicObject, KubeError>;

    async fn create(&self, resource: &ApiResource, object: &DynamicObject) -> Result<(), KubeError>;

    async fn update(&self, resource: &ApiResource, object: &DynamicObject) -> Result<(), KubeError>;

    async fn delete(&self, resource: &ApiResource, key: &ObjectKey) -> Result<(), KubeError>;

    /// `namespace == None` lists across all namespaces (or a cluster-scoped kind).
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<DynamicObject>, KubeError>;

    /// Makes a kind known to the transport. Repeated calls are no-ops.
    fn attach_scheme(&self, scheme: &Scheme) -> Result<(), KubeError>;

    fn poll_intervals(&self) -> PollIntervals {
        PollIntervals::default()
    }
}

/// Converts a typed payload into the transport representation.
pub fn to_dynamic<K: Serialize>(object: &K) -> Result<DynamicObject, KubeError> {
    let value = serde_json::to_value(object)?;
    Ok(serde_json::from_value(value)?)
}

/// Converts a transport payload back into its typed kind.
///
/// List responses may omit `apiVersion`/`kind` on items; they are filled in
/// from `resource` before decoding.
pub fn from_dynamic<K: DeserializeOwned>(
    mut object: DynamicObject,
    resource: &ApiResource,
) -> Result<K, KubeError> {
    if object.types.is_none() {
        object.types = Some(TypeMeta {
            api_version: resource.api_version.clone(),
            kind: resource.kind.clone(),
        });
    }

    let value = serde_json::to_value(&object)?;
    Ok(serde_json::from_value(value)?)
}

/// [`ResourceClient`] backed by a live API server.
pub struct KubeResourceClient {
    client: Client,
    registry: &'static SchemeRegistry,
    poll: PollIntervals,
    field_manager: String,
}

impl KubeResourceClient {
    pub async fn new() -> Result<Self, KubeError> {
        let client = Client::try_default().await.map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            registry: SchemeRegistry::global(),
            poll: PollIntervals::default(),
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
        }
    }

    pub async fn from_config(config: &ClientConfig) -> Result<Self, KubeError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = if let Some(path) = &config.kubeconfig {
            Kubeconfig::read_from(path)
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| KubeError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context: config.context.clone(),
            cluster: None,
            user: None,
        };

        let kube_config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                KubeError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(kube_config).map_err(|e| {
            KubeError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self {
            client,
            registry: SchemeRegistry::global(),
            poll: config.poll.intervals(),
            field_manager: config.field_manager.clone(),
        })
    }

    pub fn with_poll_intervals(mut self, poll: PollIntervals) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_field_manager(mut self, field_manager: impl Into<String>) -> Self {
        self.field_manager = field_manager.into();
        self
    }

    pub fn field_manager(&self) -> &str {
        &self.field_manager
    }

    /// Write parameters for create and replace, tagged with the field manager.
    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }

    pub fn into_api_client(self) -> ApiClient {
        Arc::new(self)
    }

    pub fn get_client(&self) -> Client {
        self.client.clone()
    }

    fn api(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
    ) -> Result<Api<DynamicObject>, KubeError> {
        let scheme = self.registry.lookup(resource).ok_or_else(|| {
            KubeError::ConfigError(format!(
                "no kind \"{}\" is registered for version \"{}\" in scheme",
                resource.kind, resource.api_version
            ))
        })?;

        let api = match namespace {
            Some(ns) if scheme.namespaced => {
                Api::namespaced_with(self.client.clone(), ns, resource)
            }
            _ => Api::all_with(self.client.clone(), resource),
        };

        Ok(api)
    }

    fn map_error(resource: &ApiResource, key: &ObjectKey, err: kube::Error) -> KubeError {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => {
                KubeError::not_found(&resource.kind, &key.name, key.namespace_or_empty())
            }
            kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
                KubeError::already_exists(&resource.kind, &key.name, key.namespace_or_empty())
            }
            kube::Error::Api(ae) if ae.code == 409 => KubeError::Conflict(ae.message),
            other => KubeError::Api(other),
        }
    }
}

fn key_of(object: &DynamicObject) -> Result<ObjectKey, KubeError> {
    let name = object
        .metadata
        .name
        .clone()
        .ok_or_else(|| KubeError::InvalidArgument("object name is required".to_string()))?;

    Ok(ObjectKey {
        name,
        namespace: object.metadata.namespace.clone(),
    })
}

#[async_trait::async_trait]
impl ResourceClient for KubeResourceClient {
    async fn get(&self, resource: &ApiResource, key: &ObjectKey) -> Result<DynamicObject, KubeError> {
        let api = self.api(resource, key.namespace.as_deref())?;
        api.get(&key.name)
            .await
            .map_err(|e| Self::map_error(resource, key, e))
    }

    async fn create(&self, resource: &ApiResource, object: &DynamicObject) -> Result<(), KubeError> {
        let key = key_of(object)?;
        let api = self.api(resource, key.namespace.as_deref())?;
        let pp = self.post_params();

        api.create(&pp, object)
            .await
            .map_err(|e| Self::map_error(resource, &key, e))?;
        Ok(())
    }

    async fn update(&self, resource: &ApiResource, object: &DynamicObject) -> Result<(), KubeError> {
        let key = key_of(object)?;
        let api = self.api(resource, key.namespace.as_deref())?;
        let pp = self.post_params();

        api.replace(&key.name, &pp, object)
            .await
            .map_err(|e| Self::map_error(resource, &key, e))?;
        Ok(())
    }

    async fn delete(&self, resource: &ApiResource, key: &ObjectKey) -> Result<(), KubeError> {
        let api = self.api(resource, key.namespace.as_deref())?;
        let dp = DeleteParams::default();

        api.delete(&key.name, &dp)
            .await
            .map_err(|e| Self::map_error(resource, key, e))?;
        Ok(())
    }

    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<DynamicObject>, KubeError> {
        let api = self.api(resource, namespace)?;

        api.list(options)
            .await
            .map(|list| list.items)
            .map_err(KubeError::Api)
    }

    fn attach_scheme(&self, scheme: &Scheme) -> Result<(), KubeError> {
        self.registry.register(scheme);
        Ok(())
    }

    fn poll_intervals(&self) -> PollIntervals {
        self.poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::sriov::{SriovNetwork, SriovNetworkSpec};
    use kube::Resource;

    fn local_client() -> Client {
        let config = kube::Config::new("http://127.0.0.1:6443".parse().unwrap());
        Client::try_from(config).unwrap()
    }

    #[tokio::test]
    async fn test_post_params_carry_field_manager() {
        let client = KubeResourceClient::from_client(local_client());
        assert_eq!(client.field_manager(), DEFAULT_FIELD_MANAGER);
        assert_eq!(
            client.post_params().field_manager.as_deref(),
            Some(DEFAULT_FIELD_MANAGER)
        );
        assert!(!client.post_params().dry_run);

        let client = client.with_field_manager("sriov-tests");
        assert_eq!(client.post_params().field_manager.as_deref(), Some("sriov-tests"));
    }

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::namespaced("a", "b").to_string(), "b/a");
        assert_eq!(ObjectKey::cluster("a").to_string(), "a");
    }

    #[test]
    fn test_dynamic_conversion_keeps_spec() {
        let mut network = SriovNetwork::new(
            "net1",
            SriovNetworkSpec {
                resource_name: "res".to_string(),
                network_namespace: "target".to_string(),
                ..Default::default()
            },
        );
        network.meta_mut().namespace = Some("ns1".to_string());

        let dynamic = to_dynamic(&network).unwrap();
        assert_eq!(dynamic.metadata.name.as_deref(), Some("net1"));
        assert_eq!(dynamic.data["spec"]["resourceName"], "res");

        let resource = ApiResource::erase::<SriovNetwork>(&());
        let back: SriovNetwork = from_dynamic(dynamic, &resource).unwrap();
        assert_eq!(back.spec.network_namespace, "target");
    }

    #[test]
    fn test_from_dynamic_fills_missing_types() {
        let resource = ApiResource::erase::<SriovNetwork>(&());
        let mut dynamic = DynamicObject::new("net1", &resource).within("ns1");
        dynamic.types = None;
        dynamic.data = serde_json::json!({ "spec": { "resourceName": "res" } });

        let network: SriovNetwork = from_dynamic(dynamic, &resource).unwrap();
        assert_eq!(network.spec.resource_name, "res");
    }
}
