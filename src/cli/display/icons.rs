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

//! Status icons for CLI output

use crate::infrastructure::sync::SyncStatus;

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const UPDATED: &'static str = "↻";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    pub fn get_status_icon(status: &SyncStatus) -> &'static str {
        match status {
            SyncStatus::InSync => Self::SUCCESS,
            SyncStatus::Updated(_) => Self::UPDATED,
            SyncStatus::Drift(_) => Self::WARNING,
            SyncStatus::Failed(_) => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_icon() {
        assert_eq!(StatusIcon::get_status_icon(&SyncStatus::InSync), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_status_icon(&SyncStatus::Updated(2)), StatusIcon::UPDATED);
        assert_eq!(StatusIcon::get_status_icon(&SyncStatus::Drift(2)), StatusIcon::WARNING);
        assert_eq!(
            StatusIcon::get_status_icon(&SyncStatus::Failed("x".into())),
            StatusIcon::ERROR
        );
    }
}
