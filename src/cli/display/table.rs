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

//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::infrastructure::sync::SyncReport;
use chrono::Local;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render one row per sync target followed by a summary line
    pub fn render_sync_reports(&self, reports: &[SyncReport]) -> String {
        if reports.is_empty() {
            return "No sync targets processed".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("TARGET").set_alignment(CellAlignment::Left),
                Cell::new("LOCAL DIRECTORY").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Left),
            ]);

        for report in reports {
            let icon = StatusIcon::get_status_icon(&report.status);
            table.add_row(vec![
                Cell::new(&report.name).fg(self.theme.info),
                Cell::new(&report.local_api_directory),
                Cell::new(format!("{} {}", icon, report.status))
                    .fg(self.theme.get_status_color(&report.status)),
            ]);
        }

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        let summary_color = if failed == 0 {
            self.theme.success
        } else {
            self.theme.error
        };

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ API Sync {} {} ─╮\n",
            format!("[{} targets]", reports.len())
                .bright_black()
                .to_string(),
            Local::now().format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(
            &format!("{} succeeded, {} failed", reports.len() - failed, failed)
                .color(table_color_to_colored_str(summary_color))
                .to_string(),
        );
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} In sync  {} Updated  {} Drift  {} Failed\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::UPDATED.cyan(),
            StatusIcon::WARNING.yellow(),
            StatusIcon::ERROR.red()
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sync::SyncStatus;

    fn report(name: &str, status: SyncStatus) -> SyncReport {
        SyncReport {
            name: name.to_string(),
            local_api_directory: format!("vendor/{}", name),
            status,
        }
    }

    #[test]
    fn test_render_empty_reports() {
        let renderer = TableRenderer::new();
        let output = renderer.render_sync_reports(&[]);
        assert!(output.contains("No sync targets processed"));
    }

    #[test]
    fn test_render_mixed_reports() {
        colored::control::set_override(false);
        let renderer = TableRenderer::new();
        let reports = vec![
            report("sriov", SyncStatus::InSync),
            report("oran", SyncStatus::Drift(3)),
        ];

        let output = renderer.render_sync_reports(&reports);
        assert!(output.contains("sriov"));
        assert!(output.contains("vendor/oran"));
        assert!(output.contains("[2 targets]"));
        assert!(output.contains("1 succeeded, 1 failed"));
    }
}
