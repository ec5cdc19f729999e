use anyhow::{ bail, Result };

use crate::cli::ui;
use crate::config::OutputFormat;
use crate::traits::compliance_system::ComplianceSystem;

/// Mark command: set one requirement's completion status by exact text
pub async fn execute<S: ComplianceSystem>(
    system: &S,
    requirement: &str,
    output_format: OutputFormat
) -> Result<()> {
    let preview: String = requirement.chars().take(50).collect();
    let updated = system.mark_requirement(requirement).await?;

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::json!({ "success": updated, "requirement": requirement }));
    } else if updated {
        ui::print_success(format!("Successfully updated status for: {}", preview).as_str());
    } else {
        ui::print_warning(format!("No requirement matched: {}", preview).as_str());
    }

    if !updated {
        bail!("Failed to update requirement: {}", preview);
    }
    Ok(())
}
