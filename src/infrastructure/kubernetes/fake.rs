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

//! In-memory [`ResourceClient`] for tests.
//!
//! Tracks objects by apiVersion/kind/namespace/name, bumps resourceVersion on
//! every write, rejects stale updates, filters lists by label selector, and
//! counts calls per verb so tests can assert the transport was never reached.

use crate::infrastructure::kubernetes::builder::Kind;
use crate::infrastructure::kubernetes::client::{
    from_dynamic, to_dynamic, ApiClient, ObjectKey, ResourceClient,
};
use crate::infrastructure::kubernetes::list::ListOptions;
use crate::infrastructure::kubernetes::scheme::{Scheme, SchemeRegistry};
use crate::infrastructure::kubernetes::wait::PollIntervals;
use crate::shared::error::KubeError;
use kube::core::{ApiResource, DynamicObject};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Create,
    Update,
    Delete,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct StoreKey {
    api_version: String,
    kind: String,
    namespace: String,
    name: String,
}

impl StoreKey {
    fn new(resource: &ApiResource, key: &ObjectKey) -> Self {
        Self {
            api_version: resource.api_version.clone(),
            kind: resource.kind.clone(),
            namespace: key.namespace.clone().unwrap_or_default(),
            name: key.name.clone(),
        }
    }
}

#[derive(Default)]
pub struct FakeClient {
    objects: Mutex<BTreeMap<StoreKey, DynamicObject>>,
    registry: SchemeRegistry,
    calls: Mutex<HashMap<Verb, usize>>,
    failures: Mutex<HashMap<Verb, VecDeque<KubeError>>>,
    versions: AtomicU64,
    poll: Option<PollIntervals>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object as if it already existed on the cluster.
    pub fn with_object<K: Kind>(self, object: K) -> Self {
        self.put(object);
        self
    }

    pub fn with_objects<K: Kind>(self, objects: impl IntoIterator<Item = K>) -> Self {
        for object in objects {
            self.put(object);
        }
        self
    }

    pub fn with_poll_intervals(mut self, poll: PollIntervals) -> Self {
        self.poll = Some(poll);
        self
    }

    /// Wraps the fake in an [`Arc`], returning it alongside the trait-object handle.
    pub fn into_shared(self) -> (Arc<FakeClient>, ApiClient) {
        let fake = Arc::new(self);
        let client: ApiClient = fake.clone();
        (fake, client)
    }

    /// Writes `object` straight into the store, bypassing scheme checks.
    ///
    /// Used to simulate server-side changes such as status updates.
    pub fn put<K: Kind>(&self, object: K) {
        let resource = ApiResource::erase::<K>(&());
        let mut dynamic = match to_dynamic(&object) {
            Ok(dynamic) => dynamic,
            Err(err) => panic!("failed to convert {} for fake store: {}", K::KIND_NAME, err),
        };

        let key = ObjectKey {
            name: dynamic.metadata.name.clone().unwrap_or_default(),
            namespace: dynamic.metadata.namespace.clone().filter(|_| K::NAMESPACED),
        };

        dynamic.metadata.resource_version = Some(self.next_version());
        lock(&self.objects).insert(StoreKey::new(&resource, &key), dynamic);
    }

    /// Typed view of a stored object.
    pub fn stored<K: Kind>(&self, name: &str, namespace: Option<&str>) -> Option<K> {
        let resource = ApiResource::erase::<K>(&());
        let key = ObjectKey::new(name, namespace.filter(|_| K::NAMESPACED));
        let object = lock(&self.objects)
            .get(&StoreKey::new(&resource, &key))
            .cloned()?;

        from_dynamic(object, &resource).ok()
    }

    /// Removes an object without going through the transport.
    pub fn remove<K: Kind>(&self, name: &str, namespace: Option<&str>) -> bool {
        let resource = ApiResource::erase::<K>(&());
        let key = ObjectKey::new(name, namespace.filter(|_| K::NAMESPACED));
        lock(&self.objects)
            .remove(&StoreKey::new(&resource, &key))
            .is_some()
    }

    pub fn count<K: Kind>(&self) -> usize {
        let resource = ApiResource::erase::<K>(&());
        lock(&self.objects)
            .keys()
            .filter(|k| k.api_version == resource.api_version && k.kind == resource.kind)
            .count()
    }

    pub fn calls(&self, verb: Verb) -> usize {
        lock(&self.calls).get(&verb).copied().unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Makes the next call of `verb` fail with `err`.
    pub fn fail_next(&self, verb: Verb, err: KubeError) {
        lock(&self.failures).entry(verb).or_default().push_back(err);
    }

    pub fn is_registered<K: Kind>(&self) -> bool {
        self.registry.is_registered(&Scheme::of::<K>().gvk)
    }

    fn next_version(&self) -> String {
        (self.versions.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn record(&self, verb: Verb, resource: &ApiResource) -> Result<(), KubeError> {
        *lock(&self.calls).entry(verb).or_default() += 1;

        if let Some(err) = lock(&self.failures).get_mut(&verb).and_then(VecDeque::pop_front) {
            return Err(err);
        }

        if self.registry.lookup(resource).is_none() {
            return Err(KubeError::ConfigError(format!(
                "no kind \"{}\" is registered for version \"{}\" in scheme",
                resource.kind, resource.api_version
            )));
        }

        Ok(())
    }
}

fn key_of(object: &DynamicObject) -> Result<ObjectKey, KubeError> {
    let name = object
        .metadata
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| KubeError::InvalidArgument("object name is required".to_string()))?;

    Ok(ObjectKey {
        name,
        namespace: object.metadata.namespace.clone(),
    })
}

/// Equality-based label selector: `k=v`, `k==v`, `k!=v`, `k`, `!k`.
fn matches_labels(selector: &str, labels: &BTreeMap<String, String>) -> bool {
    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| {
            if let Some((k, v)) = term.split_once("!=") {
                labels.get(k.trim()).map(String::as_str) != Some(v.trim())
            } else if let Some((k, v)) = term.split_once("==").or_else(|| term.split_once('=')) {
                labels.get(k.trim()).map(String::as_str) == Some(v.trim())
            } else if let Some(k) = term.strip_prefix('!') {
                !labels.contains_key(k.trim())
            } else {
                labels.contains_key(term)
            }
        })
}

/// Supports `metadata.name` and `metadata.namespace` terms.
fn matches_fields(selector: &str, object: &DynamicObject) -> bool {
    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| {
            let (field, value, negate) = match term.split_once("!=") {
                Some((f, v)) => (f, v, true),
                None => match term.split_once("==").or_else(|| term.split_once('=')) {
                    Some((f, v)) => (f, v, false),
                    None => return false,
                },
            };

            let actual = match field.trim() {
                "metadata.name" => object.metadata.name.as_deref(),
                "metadata.namespace" => object.metadata.namespace.as_deref(),
                _ => return false,
            };

            (actual == Some(value.trim())) != negate
        })
}

#[async_trait::async_trait]
impl ResourceClient for FakeClient {
    async fn get(&self, resource: &ApiResource, key: &ObjectKey) -> Result<DynamicObject, KubeError> {
        self.record(Verb::Get, resource)?;

        lock(&self.objects)
            .get(&StoreKey::new(resource, key))
            .cloned()
            .ok_or_else(|| KubeError::not_found(&resource.kind, &key.name, key.namespace_or_empty()))
    }

    async fn create(&self, resource: &ApiResource, object: &DynamicObject) -> Result<(), KubeError> {
        self.record(Verb::Create, resource)?;

        let key = key_of(object)?;
        let store_key = StoreKey::new(resource, &key);
        let mut objects = lock(&self.objects);

        if objects.contains_key(&store_key) {
            return Err(KubeError::already_exists(
                &resource.kind,
                &key.name,
                key.namespace_or_empty(),
            ));
        }

        if object.metadata.resource_version.is_some() {
            return Err(KubeError::InvalidArgument(
                "resourceVersion should not be set on objects to be created".to_string(),
            ));
        }

        let mut stored = object.clone();
        stored.metadata.resource_version = Some(self.next_version());
        stored.metadata.uid = Some(format!("uid-{}", key.name));
        objects.insert(store_key, stored);
        Ok(())
    }

    async fn update(&self, resource: &ApiResource, object: &DynamicObject) -> Result<(), KubeError> {
        self.record(Verb::Update, resource)?;

        let key = key_of(object)?;
        let store_key = StoreKey::new(resource, &key);
        let mut objects = lock(&self.objects);

        let current = objects.get(&store_key).ok_or_else(|| {
            KubeError::not_found(&resource.kind, &key.name, key.namespace_or_empty())
        })?;

        if let Some(version) = &object.metadata.resource_version {
            if current.metadata.resource_version.as_ref() != Some(version) {
                return Err(KubeError::Conflict(format!(
                    "Operation cannot be fulfilled on {} \"{}\": the object has been modified",
                    resource.plural, key.name
                )));
            }
        }

        let mut stored = object.clone();
        stored.metadata.uid = current.metadata.uid.clone();
        stored.metadata.resource_version = Some(self.next_version());
        objects.insert(store_key, stored);
        Ok(())
    }

    async fn delete(&self, resource: &ApiResource, key: &ObjectKey) -> Result<(), KubeError> {
        self.record(Verb::Delete, resource)?;

        lock(&self.objects)
            .remove(&StoreKey::new(resource, key))
            .map(|_| ())
            .ok_or_else(|| KubeError::not_found(&resource.kind, &key.name, key.namespace_or_empty()))
    }

    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<DynamicObject>, KubeError> {
        self.record(Verb::List, resource)?;

        let objects = lock(&self.objects);
        let items = objects
            .iter()
            .filter(|(k, _)| k.api_version == resource.api_version && k.kind == resource.kind)
            .filter(|(k, _)| namespace.map_or(true, |ns| k.namespace == ns))
            .map(|(_, object)| object)
            .filter(|object| {
                options.label_selector.as_deref().map_or(true, |selector| {
                    let labels = object.metadata.labels.clone().unwrap_or_default();
                    matches_labels(selector, &labels)
                })
            })
            .filter(|object| {
                options
                    .field_selector
                    .as_deref()
                    .map_or(true, |selector| matches_fields(selector, object))
            })
            .cloned()
            .collect();

        Ok(items)
    }

    fn attach_scheme(&self, scheme: &Scheme) -> Result<(), KubeError> {
        self.registry.register(scheme);
        Ok(())
    }

    fn poll_intervals(&self) -> PollIntervals {
        self.poll.unwrap_or_default()
    }
}
