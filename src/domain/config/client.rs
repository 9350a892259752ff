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

//! Client-side configuration: kubeconfig selection and wait cadence.

use crate::infrastructure::constants::{
    AVAILABILITY_POLL_INTERVAL, CONDITION_POLL_INTERVAL, DEFAULT_FIELD_MANAGER,
};
use crate::infrastructure::kubernetes::wait::PollIntervals;
use crate::shared::error::{KubeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Path to a kubeconfig file. Falls back to KUBECONFIG / ~/.kube/config.
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
    pub field_manager: String,
    pub poll: PollConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            poll: PollConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollConfig {
    pub condition_interval_ms: u64,
    pub availability_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            condition_interval_ms: CONDITION_POLL_INTERVAL.as_millis() as u64,
            availability_interval_ms: AVAILABILITY_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl PollConfig {
    pub fn intervals(&self) -> PollIntervals {
        PollIntervals {
            condition: Duration::from_millis(self.condition_interval_ms),
            availability: Duration::from_millis(self.availability_interval_ms),
        }
    }
}

impl ClientConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            KubeError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll.condition_interval_ms == 0 || self.poll.availability_interval_ms == 0 {
            return Err(KubeError::config_error(
                "poll intervals must be greater than zero",
            ));
        }

        if self.field_manager.is_empty() {
            return Err(KubeError::config_error("field_manager cannot be empty"));
        }

        Ok(())
    }
}

/// Applies `-D key=value` style overrides on top of a loaded configuration.
///
/// Unknown keys are ignored; unparsable durations are reported.
pub fn apply_properties(
    properties: &HashMap<String, String>,
    config: &mut ClientConfig,
) -> Result<()> {
    if let Some(path) = properties.get("client.kubeconfig") {
        config.kubeconfig = Some(path.clone());
    }

    if let Some(context) = properties.get("client.context") {
        config.context = Some(context.clone());
    }

    if let Some(manager) = properties.get("client.field-manager") {
        config.field_manager = manager.clone();
    }

    if let Some(interval) = properties.get("client.poll.condition-interval") {
        config.poll.condition_interval_ms = parse_millis("client.poll.condition-interval", interval)?;
    }

    if let Some(interval) = properties.get("client.poll.availability-interval") {
        config.poll.availability_interval_ms =
            parse_millis("client.poll.availability-interval", interval)?;
    }

    config.validate()
}

/// Parses `-D key=value` pairs into a map.
pub fn parse_properties(raw: &[String]) -> Result<HashMap<String, String>> {
    raw.iter()
        .map(|prop| {
            prop.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| {
                    KubeError::config_error(format!(
                        "Invalid property '{}', expected KEY=VALUE",
                        prop
                    ))
                })
        })
        .collect()
}

// Accepts "250ms", "3s" or a bare number of milliseconds.
fn parse_millis(key: &str, value: &str) -> Result<u64> {
    let value = value.trim();
    let parsed = if let Some(ms) = value.strip_suffix("ms") {
        ms.parse::<u64>().ok()
    } else if let Some(secs) = value.strip_suffix('s') {
        secs.parse::<u64>().ok().map(|s| s * 1000)
    } else {
        value.parse::<u64>().ok()
    };

    parsed.ok_or_else(|| KubeError::config_error(format!("Invalid duration for {}: {}", key, value)))
}
