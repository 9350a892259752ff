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

//! Builders for the SR-IOV network operator kinds.

pub mod network;
pub mod node_state;
pub mod operator_config;
pub mod policy;
pub mod pool_config;

pub use self::network::NetworkBuilder;
pub use self::node_state::NetworkNodeStateBuilder;
pub use self::operator_config::OperatorConfigBuilder;
pub use self::policy::PolicyBuilder;
pub use self::pool_config::PoolConfigBuilder;
