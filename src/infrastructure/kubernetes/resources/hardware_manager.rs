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

use crate::domain::api::hwmgr::{DellData, HardwareManager, HardwareManagerSpec, LoopbackData};
use crate::domain::condition::Condition;
use crate::infrastructure::constants::{HWMGR_ADAPTOR_IDS, HWMGR_LOG_LEVELS};
use crate::infrastructure::kubernetes::builder::validation::{non_empty, one_of};
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::Result;
use tracing::debug;

pub type HardwareManagerBuilder = Builder<HardwareManager>;

const KIND: &str = HardwareManager::KIND_NAME;

impl Kind for HardwareManager {
    const KIND_NAME: &'static str = "hardwareManager";
    const NAMESPACED: bool = true;
}

impl HasConditions for HardwareManager {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl Builder<HardwareManager> {
    pub fn new(client: &ApiClient, name: &str, namespace: &str, adaptor_id: &str) -> Self {
        debug!(name, namespace, adaptor_id, "Initializing new HardwareManager structure");

        let mut builder = Self::skeleton(client, name, Some(namespace));
        builder.definition.spec = HardwareManagerSpec {
            adaptor_id: adaptor_id.to_string(),
            ..Default::default()
        };

        if let Err(msg) = one_of(KIND, "adaptorId", adaptor_id, HWMGR_ADAPTOR_IDS) {
            builder.set_error(msg);
        }

        builder
    }

    pub fn with_loopback_data(self, additional_info: &str) -> Self {
        self.mutate(|def| {
            def.spec.loopback_data = Some(LoopbackData {
                additional_info: additional_info.to_string(),
            });
            Ok(())
        })
    }

    /// Credentials secret, OAuth client id and API endpoint of the Dell backend.
    pub fn with_dell_data(self, auth_secret: &str, client_id: &str, api_url: &str) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "authSecret", auth_secret)?;
            non_empty(KIND, "clientId", client_id)?;
            non_empty(KIND, "apiUrl", api_url)?;

            def.spec.dell_data = Some(DellData {
                auth_secret: auth_secret.to_string(),
                client_id: client_id.to_string(),
                api_url: api_url.to_string(),
                ..Default::default()
            });
            Ok(())
        })
    }

    pub fn with_log_level(self, level: &str) -> Self {
        self.mutate(|def| {
            one_of(KIND, "logLevel", level, HWMGR_LOG_LEVELS)?;
            def.spec.log_level = level.to_string();
            Ok(())
        })
    }
}

pub async fn pull(client: &ApiClient, name: &str, namespace: &str) -> Result<HardwareManagerBuilder> {
    Builder::pull(client, name, Some(namespace)).await
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<HardwareManagerBuilder>> {
    list_builders(client, Some(namespace), options).await
}
