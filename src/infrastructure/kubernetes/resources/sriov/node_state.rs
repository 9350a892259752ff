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

//! Read-only view of the per-node state reported by the SR-IOV config daemon.

use crate::domain::api::sriov::{InterfaceExt, SriovNetworkNodeState};
use crate::infrastructure::constants::SRIOV_LINK_DOWN_SPEED;
use crate::infrastructure::kubernetes::builder::{Builder, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::infrastructure::kubernetes::list::{list_builders, ListOptions};
use crate::shared::error::{KubeError, Result};
use std::time::Duration;
use tracing::debug;

pub type NetworkNodeStateBuilder = Builder<SriovNetworkNodeState>;

impl Kind for SriovNetworkNodeState {
    const KIND_NAME: &'static str = "sriovNetworkNodeState";
    const NAMESPACED: bool = true;
}

impl Builder<SriovNetworkNodeState> {
    /// State objects are named after the node they describe.
    pub fn new(client: &ApiClient, node_name: &str, namespace: &str) -> Self {
        debug!(node_name, namespace, "Initializing new SriovNetworkNodeState structure");

        Self::skeleton(client, node_name, Some(namespace))
    }

    /// Refreshes `object` from the cluster.
    pub async fn discover(&mut self) -> Result<&mut Self> {
        let observed = self.get().await?;
        self.object = Some(observed);
        Ok(self)
    }

    pub async fn get_nics(&mut self) -> Result<Vec<InterfaceExt>> {
        self.discover().await?;

        Ok(self
            .object
            .as_ref()
            .and_then(|o| o.status.as_ref())
            .map(|s| s.interfaces.clone())
            .unwrap_or_default())
    }

    /// Interfaces with carrier, i.e. a reported link speed other than down.
    pub async fn get_up_nics(&mut self) -> Result<Vec<InterfaceExt>> {
        let nics = self.get_nics().await?;

        Ok(nics
            .into_iter()
            .filter(|nic| !nic.link_speed.is_empty() && nic.link_speed != SRIOV_LINK_DOWN_SPEED)
            .collect())
    }

    pub async fn get_num_vfs(&mut self, nic_name: &str) -> Result<u32> {
        Ok(self.find_nic(nic_name).await?.num_vfs)
    }

    pub async fn get_total_vfs(&mut self, nic_name: &str) -> Result<u32> {
        Ok(self.find_nic(nic_name).await?.total_vfs)
    }

    pub async fn get_driver_name(&mut self, nic_name: &str) -> Result<String> {
        Ok(self.find_nic(nic_name).await?.driver)
    }

    pub async fn get_pci_address(&mut self, nic_name: &str) -> Result<String> {
        Ok(self.find_nic(nic_name).await?.pci_address)
    }

    pub async fn get_sync_status(&mut self) -> Result<String> {
        self.discover().await?;

        Ok(self
            .object
            .as_ref()
            .and_then(|o| o.status.as_ref())
            .map(|s| s.sync_status.clone())
            .unwrap_or_default())
    }

    /// Polls until the daemon reports `status` (e.g. `Succeeded`).
    pub async fn wait_until_sync_status(&mut self, status: &str, timeout: Duration) -> Result<&mut Self> {
        let interval = self.client().poll_intervals().condition;
        let what = format!("syncStatus {}", status);

        self.wait_for(interval, timeout, &what, |observed| {
            observed
                .status
                .as_ref()
                .is_some_and(|s| s.sync_status == status)
        })
        .await
    }

    async fn find_nic(&mut self, nic_name: &str) -> Result<InterfaceExt> {
        self.get_nics()
            .await?
            .into_iter()
            .find(|nic| nic.name == nic_name)
            .ok_or_else(|| {
                KubeError::InvalidArgument(format!(
                    "{} {} has no interface named {}",
                    SriovNetworkNodeState::KIND_NAME,
                    self.name(),
                    nic_name
                ))
            })
    }
}

pub async fn list(
    client: &ApiClient,
    namespace: &str,
    options: &[ListOptions],
) -> Result<Vec<NetworkNodeStateBuilder>> {
    list_builders(client, Some(namespace), options).await
}
