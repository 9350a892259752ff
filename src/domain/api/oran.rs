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

//! O-RAN O2IMS provisioning resources (`clcm.openshift.io/v1alpha1`).

use crate::domain::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Versioned template a provisioning request instantiates.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "clcm.openshift.io",
    version = "v1alpha1",
    kind = "ClusterTemplate",
    namespaced
)]
#[kube(status = "ClusterTemplateStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateSpec {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "templateID", default, skip_serializing_if = "String::is_empty")]
    pub template_id: String,
    #[serde(default)]
    pub templates: Templates,
    /// JSON schema the request's template parameters are validated against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_parameter_schema: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Templates {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_instance_defaults: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub policy_template_defaults: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hw_template: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub upgrade_defaults: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Request to provision a cluster from a named template version.
///
/// The object name must be a UUID.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "clcm.openshift.io",
    version = "v1alpha1",
    kind = "ProvisioningRequest"
)]
#[kube(status = "ProvisioningRequestStatus")]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequestSpec {
    /// Human-readable name, distinct from the object name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub template_name: String,
    pub template_version: String,
    #[serde(default)]
    pub template_parameters: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequestStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_status: Option<ProvisioningStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provisioning_phase: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provisioning_details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioned_resources: Option<ProvisionedResources>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedResources {
    #[serde(rename = "oCloudNodeClusterId", default, skip_serializing_if = "String::is_empty")]
    pub ocloud_node_cluster_id: String,
}
