//! Status command - show the release of a chart definition

use std::path::Path;

use console::style;
use miette::IntoDiagnostic;

use super::{HelmSettings, rows};
use crate::error::{CliError, Result};

/// Run the status command
pub fn run(settings: &HelmSettings, definition: &Path, output_json: bool) -> Result<()> {
    let builder = settings.builder(definition, None)?;
    let name = &builder.chart().name;

    let table = builder.list_releases()?;
    let Some(release) = rows(&table)
        .into_iter()
        .find(|row| row.get("NAME") == Some(name))
    else {
        return Err(CliError::NotInstalled { name: name.clone() });
    };

    if output_json {
        let json = serde_json::to_string_pretty(&release).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", style("RELEASE INFO").bold().underlined());
    for (column, value) in &release {
        let value = match column.as_str() {
            "STATUS" => status_style(value),
            "NAME" => style(value.clone()).cyan(),
            _ => style(value.clone()),
        };
        println!("  {:<13} {}", format!("{}:", title_case(column)), value);
    }

    Ok(())
}

/// Colour a helm release status
pub fn status_style(status: &str) -> console::StyledObject<String> {
    let styled = style(status.to_string());
    match status {
        "deployed" => styled.green(),
        "failed" => styled.red(),
        s if s.starts_with("pending") => styled.yellow(),
        _ => styled.dim(),
    }
}

/// `APP VERSION` -> `App version`
fn title_case(column: &str) -> String {
    let lower = column.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("APP VERSION"), "App version");
        assert_eq!(title_case("NAME"), "Name");
        assert_eq!(title_case(""), "");
    }
}
