//! Upgrade command - regenerate a chart and upgrade its release

use std::path::Path;

use console::style;

use super::{HelmSettings, ReleaseFlags};
use crate::error::Result;

/// Run the upgrade command
pub fn run(
    settings: &HelmSettings,
    definition: &Path,
    output_dir: Option<&Path>,
    keep_chart: bool,
    flags: &ReleaseFlags,
) -> Result<()> {
    let mut builder = settings.builder(definition, output_dir)?.keep_chart(keep_chart);

    println!(
        "{} Upgrading {} to version {} in namespace {}",
        style("→").blue().bold(),
        style(&builder.chart().name).cyan(),
        style(&builder.chart().version).yellow(),
        style(settings.namespace_label()).yellow()
    );

    builder.upgrade_chart(&flags.options())?;

    println!(
        "{} Successfully upgraded {}",
        style("✓").green().bold(),
        style(&builder.chart().name).cyan()
    );

    Ok(())
}
