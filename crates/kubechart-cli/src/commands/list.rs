//! List command - list releases known to helm

use console::style;
use kubechart_helm::{CommandRunner, HelmError, SystemRunner, parse_table};
use miette::IntoDiagnostic;

use super::{HelmSettings, rows, status::status_style};
use crate::error::Result;

/// Run the list command
pub fn run(settings: &HelmSettings, output_json: bool) -> Result<()> {
    let output = SystemRunner
        .run(&settings.command().list())
        .map_err(HelmError::classified)?;
    let releases = rows(&parse_table(output.as_bytes()));

    if output_json {
        let json = serde_json::to_string_pretty(&releases).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    if releases.is_empty() {
        println!(
            "No releases found in namespace {}",
            settings.namespace_label()
        );
        return Ok(());
    }

    let columns: Vec<&String> = releases[0].keys().collect();
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            releases
                .iter()
                .filter_map(|row| row.get(*column))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", style(column).bold(), width = width))
        .collect();
    println!("{}", header.join("  ").trim_end());

    for release in &releases {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                let cell = release.get(*column).cloned().unwrap_or_default();
                if column.as_str() == "STATUS" {
                    format!("{:<width$}", status_style(&cell), width = width)
                } else {
                    format!("{:<width$}", cell, width = width)
                }
            })
            .collect();
        println!("{}", line.join("  ").trim_end());
    }

    Ok(())
}
