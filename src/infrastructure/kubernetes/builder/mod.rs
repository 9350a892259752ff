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

//! The builder contract every resource kind implements.
//!
//! A [`Builder`] carries the caller's desired `definition`, the last
//! observed cluster `object`, the shared transport and a sticky validation
//! error. Mutators (`with_*`) never fail outright: a bad argument records the
//! error and leaves `definition` untouched, and the next terminal operation
//! (`create`, `update`, `delete`, `get`, `exists`, waits) reports it without
//! contacting the transport. The first recorded error wins.

pub mod validation;

use crate::domain::condition::Condition;
use crate::infrastructure::kubernetes::client::{from_dynamic, to_dynamic, ApiClient, ObjectKey};
use crate::infrastructure::kubernetes::scheme::Scheme;
use crate::infrastructure::kubernetes::wait::WaitDriver;
use crate::shared::error::{KubeError, Result};
use kube::core::ApiResource;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{self, Debug};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Static description of a resource kind.
pub trait Kind:
    Resource<DynamicType = ()>
    + Clone
    + Debug
    + Default
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Name used in error messages and log lines.
    const KIND_NAME: &'static str;

    const NAMESPACED: bool;

    /// Strips fields the server refuses on create.
    fn prepare_create(&mut self) {
        self.meta_mut().resource_version = None;
    }
}

/// Kinds whose payload carries a status condition list.
pub trait HasConditions: Kind {
    fn conditions(&self) -> &[Condition];
}

/// Escape hatch applied by [`Builder::with_options`].
pub type BuilderOption<K> = Box<dyn FnOnce(&mut Builder<K>) -> Result<()> + Send>;

pub struct Builder<K: Kind> {
    /// Desired state, edited by the `with_*` mutators.
    pub definition: K,
    /// Last state read from (or written to) the cluster.
    pub object: Option<K>,
    client: ApiClient,
    error_msg: Option<String>,
}

impl<K: Kind> Debug for Builder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("kind", &K::KIND_NAME)
            .field("definition", &self.definition)
            .field("object", &self.object)
            .field("error_msg", &self.error_msg)
            .finish()
    }
}

impl<K: Kind> Builder<K> {
    /// Wraps `definition` and makes the kind known to the transport.
    pub fn from_definition(client: &ApiClient, definition: K) -> Self {
        let mut builder = Self {
            definition,
            object: None,
            client: client.clone(),
            error_msg: None,
        };

        if let Err(err) = client.attach_scheme(&Scheme::of::<K>()) {
            builder.set_error(format!("failed to add {} scheme: {}", K::KIND_NAME, err));
        }

        builder
    }

    /// Builder whose definition and object both start from `object`.
    pub fn from_object(client: &ApiClient, object: K) -> Self {
        Self {
            definition: object.clone(),
            object: Some(object),
            client: client.clone(),
            error_msg: None,
        }
    }

    /// Skeleton definition holding only the identifying fields.
    pub fn skeleton(client: &ApiClient, name: &str, namespace: Option<&str>) -> Self {
        let mut definition = K::default();
        definition.meta_mut().name = Some(name.to_string());
        if K::NAMESPACED {
            definition.meta_mut().namespace = namespace.map(str::to_string);
        }

        let mut builder = Self::from_definition(client, definition);

        if name.is_empty() {
            builder.set_error(validation::empty_field(K::KIND_NAME, "name"));
        } else if K::NAMESPACED && namespace.map_or(true, str::is_empty) {
            builder.set_error(validation::empty_field(K::KIND_NAME, "namespace"));
        }

        builder
    }

    /// Constructs a builder from the object currently on the cluster.
    pub async fn pull(client: &ApiClient, name: &str, namespace: Option<&str>) -> Result<Self> {
        debug!(
            kind = K::KIND_NAME,
            name,
            namespace = namespace.unwrap_or_default(),
            "Pulling existing object"
        );

        if name.is_empty() {
            return Err(KubeError::ValidationError(validation::empty_field(
                K::KIND_NAME,
                "name",
            )));
        }

        if K::NAMESPACED && namespace.map_or(true, str::is_empty) {
            return Err(KubeError::ValidationError(validation::empty_field(
                K::KIND_NAME,
                "namespace",
            )));
        }

        let mut builder = Self::skeleton(client, name, namespace);
        if let Some(msg) = builder.error_msg.clone() {
            return Err(KubeError::ValidationError(msg));
        }

        match builder.get().await {
            Ok(object) => {
                builder.definition = object.clone();
                builder.object = Some(object);
                Ok(builder)
            }
            Err(err) if err.is_not_found() => Err(KubeError::does_not_exist(
                K::KIND_NAME,
                name,
                namespace.filter(|_| K::NAMESPACED),
            )),
            Err(err) => Err(err),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn name(&self) -> &str {
        self.definition.meta().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        if K::NAMESPACED {
            self.definition.meta().namespace.as_deref()
        } else {
            None
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.name(), self.namespace())
    }

    pub fn api_resource() -> ApiResource {
        ApiResource::erase::<K>(&())
    }

    /// Records a validation error; an earlier error is never replaced.
    pub fn set_error(&mut self, msg: impl Into<String>) {
        if self.error_msg.is_none() {
            self.error_msg = Some(msg.into());
        }
    }

    /// Fails with the sticky error, if any. Never mutates the builder.
    pub fn validate(&self) -> Result<()> {
        match &self.error_msg {
            Some(msg) => {
                debug!(kind = K::KIND_NAME, error = %msg, "The builder has error message");
                Err(KubeError::ValidationError(msg.clone()))
            }
            None => Ok(()),
        }
    }

    /// Applies `edit` to a draft of the definition and commits it on success.
    ///
    /// A failing edit records its message and leaves the definition as it was.
    pub fn mutate<F>(mut self, edit: F) -> Self
    where
        F: FnOnce(&mut K) -> std::result::Result<(), String>,
    {
        if self.validate().is_err() {
            return self;
        }

        let mut draft = self.definition.clone();
        match edit(&mut draft) {
            Ok(()) => self.definition = draft,
            Err(msg) => self.set_error(msg),
        }

        self
    }

    /// Applies each option in order; the first failure becomes the sticky error.
    pub fn with_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = BuilderOption<K>>,
    {
        if self.validate().is_err() {
            return self;
        }

        debug!(kind = K::KIND_NAME, name = self.name(), "Applying additional options");

        for option in options {
            if let Err(err) = option(&mut self) {
                self.set_error(format!(
                    "error occurred in mutation function: {}",
                    err
                ));
                return self;
            }

            if self.error_msg.is_some() {
                return self;
            }
        }

        self
    }

    /// Reads the object from the cluster without touching the builder.
    pub async fn get(&self) -> Result<K> {
        self.validate()?;

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            "Getting object"
        );

        let resource = Self::api_resource();
        let object = self.client.get(&resource, &self.key()).await?;
        from_dynamic(object, &resource)
    }

    /// True unless the transport positively reports the object as absent.
    ///
    /// Other transport errors count as present. On success the observed
    /// object is cached in `object`.
    pub async fn exists(&mut self) -> bool {
        if self.validate().is_err() {
            return false;
        }

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            "Checking if object exists"
        );

        match self.get().await {
            Ok(object) => {
                self.object = Some(object);
                true
            }
            Err(err) => {
                self.object = None;
                if err.is_not_found() {
                    false
                } else {
                    warn!(kind = K::KIND_NAME, name = self.name(), error = %err, "Failed to confirm absence");
                    true
                }
            }
        }
    }

    /// Creates the object unless it already exists.
    pub async fn create(&mut self) -> Result<&mut Self> {
        self.validate()?;

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            "Creating object"
        );

        if self.exists().await {
            return Ok(self);
        }

        let mut payload = self.definition.clone();
        payload.prepare_create();

        self.client
            .create(&Self::api_resource(), &to_dynamic(&payload)?)
            .await?;

        info!(kind = K::KIND_NAME, name = self.name(), "Created object");
        self.object = Some(self.definition.clone());
        Ok(self)
    }

    /// Replaces the cluster object with the definition.
    ///
    /// The observed resourceVersion is carried over for optimistic
    /// concurrency. With `force`, a rejected update falls back to delete
    /// followed by create, which drops anything the server attached to the
    /// old object.
    pub async fn update(&mut self, force: bool) -> Result<&mut Self> {
        self.validate()?;

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            force,
            "Updating object"
        );

        if !self.exists().await {
            return Err(KubeError::InvalidState(format!(
                "cannot update non-existent {}",
                K::KIND_NAME
            )));
        }

        if let Some(object) = &self.object {
            self.definition.meta_mut().resource_version = object.meta().resource_version.clone();
        }

        let result = self
            .client
            .update(&Self::api_resource(), &to_dynamic(&self.definition)?)
            .await;

        match result {
            Ok(()) => {
                self.object = Some(self.definition.clone());
                Ok(self)
            }
            Err(err) if force => {
                warn!(
                    kind = K::KIND_NAME,
                    name = self.name(),
                    error = %err,
                    "Failed to update object, recreating it"
                );

                if let Err(err) = self.delete().await {
                    warn!(
                        kind = K::KIND_NAME,
                        name = self.name(),
                        error = %err,
                        "Failed to delete object during forced update"
                    );
                    return Err(err);
                }

                self.create().await
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes the object; absent objects are not an error.
    pub async fn delete(&mut self) -> Result<&mut Self> {
        self.validate()?;

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            "Deleting object"
        );

        if !self.exists().await {
            self.object = None;
            return Ok(self);
        }

        match self.client.delete(&Self::api_resource(), &self.key()).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        info!(kind = K::KIND_NAME, name = self.name(), "Deleted object");
        self.object = None;
        Ok(self)
    }

    /// Polls until the transport reports the object as not found.
    pub async fn wait_until_deleted(&self, timeout: Duration) -> Result<()> {
        self.validate()?;

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            "Waiting until object is deleted"
        );

        let driver = WaitDriver::new(self.client.poll_intervals().availability, timeout);
        let what = format!("{} {} to be deleted", K::KIND_NAME, self.key());

        driver
            .poll(&what, move || async move {
                match self.get().await {
                    Ok(_) => Ok(None),
                    Err(err) if err.is_not_found() => Ok(Some(())),
                    Err(err) => {
                        warn!(kind = K::KIND_NAME, error = %err, "Transient error while waiting for deletion");
                        Ok(None)
                    }
                }
            })
            .await
    }

    pub async fn delete_and_wait(&mut self, timeout: Duration) -> Result<()> {
        self.delete().await?;
        self.wait_until_deleted(timeout).await
    }

    /// Polls the object until `ready` holds for an observation.
    ///
    /// Every observation is written back into `object` and `definition`.
    /// Transient read errors are logged and the poll continues.
    pub async fn wait_for<F>(
        &mut self,
        interval: Duration,
        timeout: Duration,
        what: &str,
        ready: F,
    ) -> Result<&mut Self>
    where
        F: Fn(&K) -> bool,
    {
        self.validate()?;

        if !self.exists().await {
            return Err(KubeError::InvalidState(format!(
                "cannot wait for non-existent {}",
                K::KIND_NAME
            )));
        }

        debug!(
            kind = K::KIND_NAME,
            name = self.name(),
            namespace = self.namespace().unwrap_or_default(),
            what,
            "Waiting for object"
        );

        let driver = WaitDriver::new(interval, timeout);
        let label = format!("{} {} {}", K::KIND_NAME, self.key(), what);

        driver
            .run(&label, async {
                loop {
                    match self.get().await {
                        Ok(observed) => {
                            let done = ready(&observed);
                            self.definition = observed.clone();
                            self.object = Some(observed);
                            if done {
                                return Ok(());
                            }
                        }
                        Err(err) => {
                            warn!(kind = K::KIND_NAME, error = %err, "Transient error while waiting");
                        }
                    }

                    driver.tick().await;
                }
            })
            .await?;

        Ok(self)
    }
}

impl<K: HasConditions> Builder<K> {
    /// Waits until some observed condition matches every non-empty field of
    /// `expected`.
    pub async fn wait_for_condition(
        &mut self,
        expected: &Condition,
        timeout: Duration,
    ) -> Result<&mut Self> {
        let interval = self.client.poll_intervals().condition;
        let what = format!("condition {} to be {}", expected.type_, expected.status);

        self.wait_for(interval, timeout, &what, |observed| {
            observed.conditions().iter().any(|c| c.matches(expected))
        })
        .await
    }
}

#[cfg(test)]
mod tests;
