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

pub mod builder;
pub mod client;
pub mod fake;
pub mod list;
pub mod resources;
pub mod scheme;
pub mod wait;

pub use self::builder::{Builder, BuilderOption, HasConditions, Kind};
pub use self::client::{ApiClient, KubeResourceClient, ObjectKey, ResourceClient};
pub use self::fake::{FakeClient, Verb};
pub use self::list::{clean_all, list_builders, single_list_options, ListOptions};
pub use self::scheme::{Scheme, SchemeRegistry};
pub use self::wait::{PollIntervals, WaitDriver};
