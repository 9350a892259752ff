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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, KubeError>;

#[derive(Error, Debug)]
pub enum KubeError {
    #[error(transparent)]
    Api(#[from] kube::Error),

    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Resource already exists: {resource_type} '{name}' in namespace '{namespace}'")]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Lookup failure reported by `pull` when the object is absent.
    #[error(
        "{kind} object {name} does not exist{}",
        namespace.as_ref().map(|ns| format!(" in namespace {}", ns)).unwrap_or_default()
    )]
    DoesNotExist {
        kind: String,
        name: String,
        namespace: Option<String>,
    },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    InvalidArgument(String),

    /// Sticky builder error, reported verbatim.
    #[error("{0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Command error: {0}")]
    Command(#[from] xshell::Error),
}

impl KubeError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn does_not_exist(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
    ) -> Self {
        Self::DoesNotExist {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    /// True when the transport reported the object as absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Api(kube::Error::Api(ae)) => ae.code == 404,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_does_not_exist_message() {
        let err = KubeError::does_not_exist("sriovNetwork", "net1", Some("ns1"));
        assert_eq!(
            err.to_string(),
            "sriovNetwork object net1 does not exist in namespace ns1"
        );

        let err = KubeError::does_not_exist("performanceProfile", "default", None);
        assert_eq!(
            err.to_string(),
            "performanceProfile object default does not exist"
        );
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = KubeError::ValidationError("sriovNetwork 'name' cannot be empty".to_string());
        assert_eq!(err.to_string(), "sriovNetwork 'name' cannot be empty");
    }

    #[test]
    fn test_is_not_found() {
        assert!(KubeError::not_found("SriovNetwork", "a", "b").is_not_found());
        assert!(!KubeError::KubeError("boom".to_string()).is_not_found());
    }
}
