use anyhow::{ anyhow, Result };
use std::fs;
use std::path::Path;

use crate::cli::ui;
use crate::config::OutputFormat;
use crate::traits::compliance_system::ComplianceSystem;

/// Process command: evaluate one transcript against the stored checklist
pub async fn execute<S: ComplianceSystem>(
    system: &S,
    file: Option<&Path>,
    text: Option<&str>,
    output_format: OutputFormat
) -> Result<()> {
    let transcript = match (file, text) {
        (Some(path), _) =>
            fs
                ::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read transcript file {}: {}", path.display(), e))?,
        (None, Some(text)) => text.to_string(),
        (None, None) => ui::get_transcript()?,
    };

    if transcript.trim().is_empty() {
        return Err(anyhow!("Conversation text is required"));
    }

    let spinner = ui::spinner_with_message("Checking conversation against requirements...");
    let result = system.process_transcript(&transcript).await;
    spinner.finish_and_clear();
    let run = result?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
        OutputFormat::Text => ui::display_run(&run),
    }

    Ok(())
}
