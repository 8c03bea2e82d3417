//! Template command - render a chart definition locally

use std::path::Path;

use console::style;
use kubechart_core::{assemble, render};

use crate::definition::ChartDefinition;
use crate::error::Result;

/// Run the template command
///
/// Without an output directory the chart is printed to stdout, one
/// document per file.
pub fn run(definition_path: &Path, output_dir: Option<&Path>) -> Result<()> {
    let definition = ChartDefinition::load(definition_path)?;
    let chart = &definition.chart;
    let objects = definition.resources();

    let Some(output_dir) = output_dir else {
        for file in render(chart, &objects)? {
            println!("---");
            println!("# Source: {}/{}", chart.name, file.path.display());
            print!("{}", file.content);
        }
        return Ok(());
    };

    let generated = assemble(chart, &objects, &output_dir.join(&chart.name))?;

    println!(
        "{} Generated chart {} version {} at {}",
        style("✓").green().bold(),
        style(&chart.name).cyan(),
        style(&chart.version).yellow(),
        generated.root.display()
    );
    for file in generated.files() {
        let relative = file.strip_prefix(&generated.root).unwrap_or(file.as_path());
        println!("  {}", style(relative.display()).dim());
    }

    Ok(())
}
