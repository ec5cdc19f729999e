use anyhow::{ anyhow, Result };
use std::fs;
use std::path::Path;

use crate::cli::ui;
use crate::config::OutputFormat;
use crate::traits::compliance_system::ComplianceSystem;

/// Ingest command: turn a procedure description into stored checklist rows
pub async fn execute<S: ComplianceSystem>(
    system: &S,
    procedure_path: &Path,
    dry_run: bool,
    assume_yes: bool,
    output_format: OutputFormat
) -> Result<()> {
    let procedure = fs
        ::read_to_string(procedure_path)
        .map_err(|e| anyhow!("Failed to read procedure file: {}", e))?;

    let spinner = ui::spinner_with_message("Extracting procedure steps...");
    let result = system.extract_procedure(&procedure).await;
    spinner.finish_and_clear();
    let steps = result?;

    if steps.is_empty() {
        return Err(anyhow!("No steps could be extracted from {}", procedure_path.display()));
    }

    if output_format == OutputFormat::Text {
        ui::print_header("Extracted Steps");
        ui::print_steps(&steps);
    }

    if dry_run {
        if output_format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
        return Ok(());
    }

    if !assume_yes && !ui::confirm_action(format!("Store {} steps?", steps.len()).as_str())? {
        ui::print_info("Nothing stored.");
        return Ok(());
    }

    let stored = system.store_requirements(&steps).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stored)?),
        OutputFormat::Text =>
            ui::print_success(format!("Stored {} requirements", stored.len()).as_str()),
    }
    Ok(())
}
