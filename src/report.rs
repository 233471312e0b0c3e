//! Check result reporting
//!
//! Renders results to stdout as a table, JSON, or plain lines, and writes an
//! optional JSON file.

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::freshness::{CheckResult, Verdict};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Output format for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// `[verdict] container image`, one per line
    Plain,
}

/// Verdict counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub yes: usize,
    pub no: usize,
    pub unknown: usize,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.verdict {
                Verdict::Yes => summary.yes += 1,
                Verdict::No => summary.no += 1,
                Verdict::Unknown => summary.unknown += 1,
            }
        }
        summary
    }
}

/// A finished check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub checked_at: DateTime<Utc>,
    pub summary: Summary,
    pub results: Vec<CheckResult>,
}

impl Report {
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self {
            checked_at: Utc::now(),
            summary: Summary::from_results(&results),
            results,
        }
    }

    /// Print to stdout in the given format
    pub fn print(&self, format: OutputFormat) -> ImgfreshResult<()> {
        match format {
            OutputFormat::Table => print!("{}", self.table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            OutputFormat::Plain => print!("{}", self.plain()),
        }
        Ok(())
    }

    /// Write the report as JSON
    pub async fn write_json(&self, path: &Path) -> ImgfreshResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ImgfreshError::io(format!("creating {}", parent.display()), e))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .await
            .map_err(|e| ImgfreshError::io(format!("writing report to {}", path.display()), e))?;

        info!("Report written to {}", path.display());
        Ok(())
    }

    fn table(&self) -> String {
        if self.results.is_empty() {
            return "No containers found\n".to_string();
        }

        let name_width = column_width(self.results.iter().map(|r| r.container.as_str()), "CONTAINER");
        let mut out = format!(
            "{:<10} {:<name_width$} {}\n",
            style("LATEST").bold(),
            style("CONTAINER").bold(),
            style("IMAGE").bold(),
        );

        for result in &self.results {
            let verdict = match result.verdict {
                Verdict::Yes => style("yes").green(),
                Verdict::No => style("no").red(),
                Verdict::Unknown => style("unknown").yellow(),
            };
            out.push_str(&format!(
                "{:<10} {:<name_width$} {}\n",
                verdict, result.container, result.image
            ));
        }

        out.push_str(&format!(
            "\n{} up to date, {} outdated, {} unknown\n",
            self.summary.yes, self.summary.no, self.summary.unknown
        ));
        out
    }

    fn plain(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{:>10} {} {}\n", format!("[{}]", r.verdict), r.container, r.image))
            .collect()
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn results() -> Vec<CheckResult> {
        vec![
            CheckResult {
                container: "db".to_string(),
                image: "postgres:16.2".to_string(),
                verdict: Verdict::No,
            },
            CheckResult {
                container: "mqtt".to_string(),
                image: "eclipse-mosquitto:2.0.18".to_string(),
                verdict: Verdict::Yes,
            },
            CheckResult {
                container: "esphome".to_string(),
                image: "ghcr.io/esphome/esphome:2024.6".to_string(),
                verdict: Verdict::Unknown,
            },
        ]
    }

    #[test]
    fn summary_counts() {
        let summary = Summary::from_results(&results());
        assert_eq!(summary, Summary { yes: 1, no: 1, unknown: 1 });
    }

    #[test]
    fn plain_lines_keep_order() {
        let report = Report::new(results());
        let plain = report.plain();
        let lines: Vec<&str> = plain.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "      [no] db postgres:16.2");
        assert!(lines[2].ends_with("esphome ghcr.io/esphome/esphome:2024.6"));
    }

    #[test]
    fn table_lists_every_container() {
        let table = Report::new(results()).table();
        assert!(table.contains("postgres:16.2"));
        assert!(table.contains("eclipse-mosquitto:2.0.18"));
        assert!(table.contains("1 up to date, 1 outdated, 1 unknown"));
    }

    #[test]
    fn empty_table() {
        assert_eq!(Report::new(vec![]).table(), "No containers found\n");
    }

    #[tokio::test]
    async fn writes_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");

        Report::new(results()).write_json(&path).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["summary"]["no"], 1);
        assert_eq!(parsed["results"][0]["container"], "db");
        assert_eq!(parsed["results"][2]["is_latest"], "unknown");
        assert!(parsed["checked_at"].is_string());
    }
}
