//! Install command - generate a chart and install it with helm

use std::path::Path;

use console::style;

use super::{HelmSettings, ReleaseFlags};
use crate::error::Result;

/// Run the install command
pub fn run(
    settings: &HelmSettings,
    definition: &Path,
    output_dir: Option<&Path>,
    keep_chart: bool,
    flags: &ReleaseFlags,
) -> Result<()> {
    let mut builder = settings.builder(definition, output_dir)?.keep_chart(keep_chart);

    println!(
        "{} Installing chart {} version {} ({} objects) in namespace {}",
        style("→").blue().bold(),
        style(&builder.chart().name).cyan(),
        style(&builder.chart().version).yellow(),
        builder.objects().len(),
        style(settings.namespace_label()).yellow()
    );

    builder.install_chart(&flags.options())?;

    println!(
        "{} Successfully installed {}",
        style("✓").green().bold(),
        style(&builder.chart().name).cyan()
    );
    if keep_chart {
        println!("  Chart kept at {}", builder.chart_dir().display());
    }

    Ok(())
}
