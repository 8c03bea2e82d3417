//! Uninstall command - remove a chart's release

use std::path::Path;

use console::style;

use super::HelmSettings;
use crate::error::Result;

/// Run the uninstall command
pub fn run(settings: &HelmSettings, definition: &Path) -> Result<()> {
    let mut builder = settings.builder(definition, None)?;

    println!(
        "{} Uninstalling release {} from namespace {}",
        style("→").blue().bold(),
        style(&builder.chart().name).cyan(),
        style(settings.namespace_label()).yellow()
    );

    builder.uninstall_chart()?;

    println!(
        "{} Successfully uninstalled {}",
        style("✓").green().bold(),
        style(&builder.chart().name).cyan()
    );

    Ok(())
}
