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

//! The cluster-scoped `version` singleton that drives OpenShift upgrades.

use crate::domain::api::clusterversion::{ClusterVersion, Release, Update};
use crate::domain::condition::Condition;
use crate::infrastructure::constants::{CLUSTER_VERSION_NAME, CONDITION_TRUE};
use crate::infrastructure::kubernetes::builder::validation::non_empty;
use crate::infrastructure::kubernetes::builder::{Builder, HasConditions, Kind};
use crate::infrastructure::kubernetes::client::ApiClient;
use crate::shared::error::{KubeError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

pub type ClusterVersionBuilder = Builder<ClusterVersion>;

const KIND: &str = ClusterVersion::KIND_NAME;

/// History state the CVO records once every operator reports the new version.
const UPDATE_COMPLETED: &str = "Completed";

impl Kind for ClusterVersion {
    const KIND_NAME: &'static str = "clusterVersion";
    const NAMESPACED: bool = false;
}

impl HasConditions for ClusterVersion {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

/// Which component of the version an upgrade moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStream {
    /// Next minor release, e.g. 4.15.z to 4.16.z.
    Y,
    /// Later patch of the same minor, e.g. 4.15.3 to 4.15.9.
    Z,
}

impl fmt::Display for UpdateStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStream::Y => write!(f, "y-stream"),
            UpdateStream::Z => write!(f, "z-stream"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Semver {
    major: u64,
    minor: u64,
    patch: u64,
}

fn parse_version(version: &str) -> Option<Semver> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let re = VERSION.get_or_init(|| {
        Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)").expect("static version pattern")
    });

    let caps = re.captures(version)?;
    Some(Semver {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
        patch: caps[3].parse().ok()?,
    })
}

fn in_stream(current: Semver, candidate: Semver, stream: UpdateStream) -> bool {
    match stream {
        UpdateStream::Y => candidate.major == current.major && candidate.minor == current.minor + 1,
        UpdateStream::Z => {
            candidate.major == current.major
                && candidate.minor == current.minor
                && candidate.patch > current.patch
        }
    }
}

impl Builder<ClusterVersion> {
    /// Requests an upgrade to `image`; `force` skips signature and precondition checks.
    pub fn with_desired_update_image(self, image: &str, force: bool) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "desiredUpdate.image", image)?;
            def.spec.desired_update = Some(Update {
                image: image.to_string(),
                force,
                ..Default::default()
            });
            Ok(())
        })
    }

    pub fn with_desired_update_channel(self, channel: &str) -> Self {
        self.mutate(|def| {
            non_empty(KIND, "channel", channel)?;
            def.spec.channel = channel.to_string();
            Ok(())
        })
    }

    /// Version the cluster is currently reconciling towards.
    pub fn desired_version(&self) -> Option<&str> {
        self.object
            .as_ref()?
            .status
            .as_ref()
            .map(|s| s.desired.version.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Image of the newest release in `stream` offered for the current version.
    ///
    /// Conditional updates (those the CVO flags as risky) are only considered
    /// with `accept_conditional`.
    pub async fn get_next_update_version_image(
        &mut self,
        stream: UpdateStream,
        accept_conditional: bool,
    ) -> Result<String> {
        let observed = self.get().await?;
        let status = observed.status.clone().unwrap_or_default();

        let current = parse_version(&status.desired.version).ok_or_else(|| {
            KubeError::InvalidState(format!(
                "{} has unparsable desired version '{}'",
                KIND, status.desired.version
            ))
        })?;

        let conditional = status
            .conditional_updates
            .iter()
            .filter(|_| accept_conditional)
            .map(|u| &u.release);

        let next: Option<(Semver, &Release)> = status
            .available_updates
            .iter()
            .chain(conditional)
            .filter_map(|release| parse_version(&release.version).map(|v| (v, release)))
            .filter(|(v, _)| in_stream(current, *v, stream))
            .max_by_key(|(v, _)| *v);

        let image = next.map(|(_, release)| release.image.clone()).ok_or_else(|| {
            KubeError::InvalidState(format!(
                "no {} update available for version {}",
                stream, status.desired.version
            ))
        })?;

        debug!(%stream, image = %image, "Found next update image");
        self.object = Some(observed);
        Ok(image)
    }

    /// Waits for the condition of type `condition_type` to report `True`.
    pub async fn wait_until_condition_true(
        &mut self,
        condition_type: &str,
        timeout: Duration,
    ) -> Result<&mut Self> {
        self.wait_for_condition(&Condition::new(condition_type, CONDITION_TRUE), timeout)
            .await
    }

    /// Waits until the latest history entry is a completed update to `version`.
    pub async fn wait_until_updated(&mut self, version: &str, timeout: Duration) -> Result<&mut Self> {
        let interval = self.client().poll_intervals().condition;
        let what = format!("update to {} to complete", version);

        self.wait_for(interval, timeout, &what, |observed| {
            observed
                .status
                .as_ref()
                .and_then(|s| s.history.first())
                .is_some_and(|h| h.state == UPDATE_COMPLETED && h.version == version)
        })
        .await?;

        info!(version, "Cluster update completed");
        Ok(self)
    }
}

pub async fn pull(client: &ApiClient) -> Result<ClusterVersionBuilder> {
    Builder::pull(client, CLUSTER_VERSION_NAME, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::clusterversion::{
        ClusterVersionSpec, ClusterVersionStatus, ConditionalUpdate, UpdateHistory,
    };
    use crate::infrastructure::constants::CLUSTER_VERSION_AVAILABLE;
    use crate::infrastructure::kubernetes::fake::FakeClient;

    fn release(version: &str) -> Release {
        Release {
            version: version.to_string(),
            image: format!("quay.io/openshift-release-dev/ocp-release:{}", version),
            ..Default::default()
        }
    }

    fn version() -> ClusterVersion {
        let mut cv = ClusterVersion::new(
            CLUSTER_VERSION_NAME,
            ClusterVersionSpec {
                channel: "stable-4.15".to_string(),
                ..Default::default()
            },
        );
        cv.status = Some(ClusterVersionStatus {
            desired: release("4.15.3"),
            history: vec![UpdateHistory {
                state: UPDATE_COMPLETED.to_string(),
                version: "4.15.3".to_string(),
                ..Default::default()
            }],
            conditions: vec![Condition::new(CLUSTER_VERSION_AVAILABLE, CONDITION_TRUE)],
            available_updates: vec![release("4.15.5"), release("4.15.9"), release("4.16.1")],
            conditional_updates: vec![ConditionalUpdate {
                release: release("4.16.4"),
                conditions: vec![],
            }],
            ..Default::default()
        });
        cv
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("4.15.3"),
            Some(Semver { major: 4, minor: 15, patch: 3 })
        );
        assert!(parse_version("4.15.0-rc.1").is_some());
        assert!(parse_version("latest").is_none());
    }

    #[tokio::test]
    async fn test_next_update_image() {
        let (_, api) = FakeClient::new().with_object(version()).into_shared();
        let mut builder = pull(&api).await.unwrap();

        let z = builder.get_next_update_version_image(UpdateStream::Z, false).await.unwrap();
        assert!(z.ends_with(":4.15.9"));

        let y = builder.get_next_update_version_image(UpdateStream::Y, false).await.unwrap();
        assert!(y.ends_with(":4.16.1"));

        let y = builder.get_next_update_version_image(UpdateStream::Y, true).await.unwrap();
        assert!(y.ends_with(":4.16.4"));
    }

    #[tokio::test]
    async fn test_no_update_in_stream() {
        let mut cv = version();
        if let Some(status) = cv.status.as_mut() {
            status.available_updates.clear();
        }
        let (_, api) = FakeClient::new().with_object(cv).into_shared();

        let err = pull(&api)
            .await
            .unwrap()
            .get_next_update_version_image(UpdateStream::Z, true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no z-stream update available for version 4.15.3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_desired_update_and_wait() {
        let (fake, api) = FakeClient::new().with_object(version()).into_shared();

        let mut builder = pull(&api)
            .await
            .unwrap()
            .with_desired_update_image("quay.io/openshift-release-dev/ocp-release:4.15.9", false);
        builder.update(false).await.unwrap();

        builder
            .wait_until_condition_true(CLUSTER_VERSION_AVAILABLE, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(builder
            .wait_until_updated("4.15.9", Duration::from_secs(5))
            .await
            .unwrap_err()
            .is_timeout());

        let mut updated = fake.stored::<ClusterVersion>(CLUSTER_VERSION_NAME, None).unwrap();
        if let Some(status) = updated.status.as_mut() {
            status.desired = release("4.15.9");
            status.history.insert(
                0,
                UpdateHistory {
                    state: UPDATE_COMPLETED.to_string(),
                    version: "4.15.9".to_string(),
                    ..Default::default()
                },
            );
        }
        fake.put(updated);

        builder.wait_until_updated("4.15.9", Duration::from_secs(5)).await.unwrap();
        assert_eq!(builder.desired_version(), Some("4.15.9"));
    }

    #[test]
    fn test_empty_image_rejected() {
        let (_, api) = FakeClient::new().into_shared();
        let builder = Builder::<ClusterVersion>::skeleton(&api, CLUSTER_VERSION_NAME, None)
            .with_desired_update_image("", true);

        assert_eq!(
            builder.error_msg(),
            Some("clusterVersion 'desiredUpdate.image' cannot be empty")
        );
    }
}
