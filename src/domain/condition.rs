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

//! Status conditions and the match-by-example predicate used by waits.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Wire-compatible with `metav1.Condition` and the OpenShift
/// `ClusterOperatorStatusCondition`; every field but `type`/`status` is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// True when every non-empty field of `expected` matches.
    ///
    /// Type, status and reason compare exactly; message is a substring match.
    pub fn matches(&self, expected: &Condition) -> bool {
        (expected.type_.is_empty() || self.type_ == expected.type_)
            && (expected.status.is_empty() || self.status == expected.status)
            && (expected.reason.is_empty() || self.reason == expected.reason)
            && (expected.message.is_empty() || self.message.contains(&expected.message))
    }
}

/// First condition in `conditions` matching `expected`.
pub fn find_matching<'a>(conditions: &'a [Condition], expected: &Condition) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.matches(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> Condition {
        Condition::new("ClusterTemplateValidated", "True")
            .with_reason("Completed")
            .with_message("The cluster template validation succeeded")
    }

    #[test]
    fn test_exact_match() {
        let expected = Condition::new("ClusterTemplateValidated", "True").with_reason("Completed");
        assert!(observed().matches(&expected));
    }

    #[test]
    fn test_empty_fields_are_wildcards() {
        assert!(observed().matches(&Condition::default()));
        assert!(observed().matches(&Condition::new("ClusterTemplateValidated", "")));
        assert!(observed().matches(&Condition::new("", "True")));
    }

    #[test]
    fn test_message_is_substring() {
        let expected = Condition::default().with_message("validation succeeded");
        assert!(observed().matches(&expected));

        let expected = Condition::default().with_message("validation failed");
        assert!(!observed().matches(&expected));
    }

    #[test]
    fn test_mismatch() {
        assert!(!observed().matches(&Condition::new("ClusterTemplateValidated", "False")));
        assert!(!observed().matches(&Condition::default().with_reason("Failed")));
    }

    #[test]
    fn test_find_matching() {
        let conditions = vec![Condition::new("Progressing", "True"), observed()];
        let found = find_matching(&conditions, &Condition::new("", "True").with_reason("Completed"));
        assert_eq!(found.map(|c| c.type_.as_str()), Some("ClusterTemplateValidated"));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(observed()).unwrap();
        assert_eq!(json["type"], "ClusterTemplateValidated");
        assert!(json.get("lastTransitionTime").is_none());
    }
}
