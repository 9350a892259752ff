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

//! Per-kind builders.
//!
//! Each module implements [`Kind`](super::builder::Kind) for its payload,
//! adds the kind's constructor and `with_*` mutators as an inherent impl on
//! `Builder<Payload>`, and exposes free `pull`/`list` functions.

pub mod allocated_node;
pub mod cgu;
pub mod cluster_template;
pub mod cluster_version;
pub mod hardware_manager;
pub mod performance_profile;
pub mod provisioning_request;
pub mod resource_quota;
pub mod sriov;
