use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;
use serde_json::json;

use crate::codec::{self, ExportDocument};
use crate::error::Result;
use crate::model::{Task, TaskField};
use crate::preview::{self, Theme};
use crate::settings::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

/// One row of a validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub index: usize,
    pub missing: Vec<TaskField>,
}

pub fn validation_report(tasks: &[Task]) -> Vec<TaskReport> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskReport {
            index,
            missing: task.missing_fields(),
        })
        .collect()
}

pub fn print_validation(report: &[TaskReport], format: Format) -> Result<()> {
    let incomplete: Vec<&TaskReport> = report.iter().filter(|r| !r.missing.is_empty()).collect();
    match format {
        Format::Json => {
            let rows: Vec<_> = incomplete
                .iter()
                .map(|r| {
                    json!({
                        "index": r.index,
                        "missing": r.missing.iter().map(|f| f.key()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            let value = json!({
                "valid": incomplete.is_empty(),
                "tasks": report.len(),
                "incomplete": rows,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
        Format::Pretty => {
            for row in report {
                if row.missing.is_empty() {
                    println!("task {}: {}", row.index + 1, "ok".green());
                } else {
                    let missing: Vec<&str> = row.missing.iter().map(|f| f.key()).collect();
                    println!(
                        "task {}: {} ({})",
                        row.index + 1,
                        "incomplete".red().bold(),
                        missing.join(", ")
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn print_exported(path: &Path, tasks: usize, variant: Variant, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let value = json!({
                "exported": path.display().to_string(),
                "tasks": tasks,
                "variant": variant,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
        Format::Pretty => println!(
            "Exported {} task(s) to {}",
            tasks,
            path.display().to_string().cyan()
        ),
    }
    Ok(())
}

/// Print a document: compact for json, highlighted otherwise.
pub fn print_document(document: &ExportDocument, theme: Theme, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(document)?),
        Format::Pretty => {
            let pretty = codec::to_pretty_json(document)?;
            println!("{}", preview::highlight_ansi(&pretty, theme));
        }
    }
    Ok(())
}

pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
