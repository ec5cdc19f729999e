use anyhow::{ anyhow, Result };

use crate::cli::ui;
use crate::config::OutputFormat;
use crate::models::common::Phase;
use crate::traits::compliance_system::ComplianceSystem;

/// List command: show the checklist and completion state
pub async fn execute<S: ComplianceSystem>(
    system: &S,
    phase: Option<&str>,
    output_format: OutputFormat
) -> Result<()> {
    let phase = match phase {
        Some(label) => Some(Phase::from_label(label).ok_or_else(|| anyhow!("Unknown phase: {}", label))?),
        None => None,
    };

    let requirements = system.list_requirements(phase).await?;

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&requirements)?);
        return Ok(());
    }

    ui::print_header("Compliance Checklist");
    if requirements.is_empty() {
        ui::print_info("No requirements found");
    } else {
        ui::print_checklist(&requirements);
    }
    Ok(())
}
