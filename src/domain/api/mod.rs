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

//! Typed payloads for the custom resources the builders manage.
//!
//! Only the fields the builders set, validate or read are modelled; the
//! server remains the authority on the full schema.

pub mod clusterversion;
pub mod hwmgr;
pub mod oran;
pub mod performance;
pub mod ran;
pub mod sriov;
