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

//! O-RAN provisioning requests.
//!
//! Requests are cluster-scoped and named by UUID. Deletion is asynchronous:
//! the hub tears the provisioned cluster down before the finalizer clears, so
//! callers normally use `delete_and_wait`.

use crate::domain::api::oran::{ProvisioningRequest, ProvisioningRequestSpec};
use crate::domain::condition::Condition;
use crate::infrastructure::constants::PROVISIONING_FULFILLED;
use crate::infrastructure::kubernetes::builder::validation::{non_empty, uuid};
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

pub type ProvisioningRequestBuilder = Builder<ProvisioningRequest>;

const KIND: &str = ProvisioningRequest::KIND_NAME;

impl Kind for ProvisioningRequest {
    const KIND_NAME: &'static str = "provisioningRequest";
    const NAMESPACED: bool = false;
}

impl HasConditions for ProvisioningRequest {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl Builder<ProvisioningRequest> {
    pub fn new(client: &ApiClient, name: &str, template_name: &str, template_version: &str) -> Self {
        debug!(
            name,
            template_name,
            template_version,
            "Initializing new ProvisioningRequest structure"
        );

        let mut builder = Self::skeleton(client, name, None);
        builder.definition.spec = ProvisioningRequestSpec {
            template_name: template_name.to_string(),
            template_version: template_version.to_string(),
            ..Default::default()
        };

        let checks = uuid(KIND, "name", name)
            .and_then(|_| non_empty(KIND, "templateName", template_name))
            .and_then(|_| non_empty(KIND, "templateVersion", template_version));

        if let Err(msg) = checks {
            builder.set_error(msg);
        }

        builder
    }

    /// Human-readable name shown by the O2IMS API.
    pub fn with_name(self, name: &str) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "spec.name", name)?;
            def.spec.name = name.to_string();
            Ok(())
        })
    }

    pub fn with_description(self, description: &str) -> Self {
        self.mutate(|def| {
            def.spec.description = description.to_string();
            Ok(())
        })
    }

    pub fn with_template_parameter(self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.mutate(|def| {
            non_empty(KIND, "templateParameters key", key)?;
            def.spec.template_parameters.insert(key.to_string(), value);
            Ok(())
        })
    }

    /// Replaces every template parameter.
    pub fn with_template_parameters(self, parameters: Map<String, Value>) -> Self {
        self.mutate(|def| {
            if parameters.is_empty() {
                return Err(format!("{} 'templateParameters' cannot be empty", KIND));
            }

            def.spec.template_parameters = parameters;
            Ok(())
        })
    }

    pub fn provisioning_phase(&self) -> Option<&str> {
        self.object
            .as_ref()?
            .status
            .as_ref()?
            .provisioning_status
            .as_ref()
            .map(|s| s.provisioning_phase.as_str())
    }

    /// Waits until the hub reports the provisioning phase as fulfilled.
    pub async fn wait_until_fulfilled(&mut self, timeout: Duration) -> Result<&mut Self> {
        let interval = self.client().poll_intervals().condition;

        self.wait_for(interval, timeout, "to be fulfilled", |observed| {
            observed
                .status
                .as_ref()
                .and_then(|s| s.provisioning_status.as_ref())
                .is_some_and(|s| s.provisioning_phase == PROVISIONING_FULFILLED)
        })
        .await?;

        info!(name = self.name(), "ProvisioningRequest fulfilled");
        Ok(self)
    }
}

pub async fn pull(client: &ApiClient, name: &str) -> Result<ProvisioningRequestBuilder> {
    Builder::pull(client, name, None).await
}

pub async fn list(client: &ApiClient, options: &[ListOptions]) -> Result<Vec<ProvisioningRequestBuilder>> {
    list_builders(client, None, options).await
}
