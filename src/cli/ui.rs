use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Confirm, Input };
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use crate::models::common::Phase;
use crate::models::outcome::{ ComplianceOutcome, ComplianceRun };
use crate::models::requirement::{ NewRequirement, Requirement };

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn terminal_width() -> usize {
    let width = Term::stdout().size().1 as usize;
    if width == 0 { 80 } else { width }
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = terminal_width();
    for line in text.lines() {
        if line.starts_with('-') {
            println!("{}", line);
        } else {
            for wrapped_line in wrap(line, width.saturating_sub(10).max(20)) {
                println!("{}", wrapped_line);
            }
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Print one stored requirement as a checklist line
pub fn print_requirement(requirement: &Requirement) {
    let mark = if requirement.completion_status { "✓".green().bold() } else { "·".dimmed() };
    println!(
        "  {} [{}] {}. {}",
        mark,
        requirement.phase.as_str().cyan(),
        requirement.order,
        requirement.text
    );
}

/// Print a checklist grouped by phase
pub fn print_checklist(requirements: &[Requirement]) {
    for phase in Phase::ALL {
        let in_phase: Vec<&Requirement> = requirements
            .iter()
            .filter(|r| r.phase == phase)
            .collect();
        if in_phase.is_empty() {
            continue;
        }

        let done = in_phase
            .iter()
            .filter(|r| r.completion_status)
            .count();
        println!("{} ({}/{})", phase.as_str().to_uppercase().bold(), done, in_phase.len());
        for requirement in in_phase {
            print_requirement(requirement);
        }
    }
}

/// Print extracted, not yet stored, steps
pub fn print_steps(steps: &[NewRequirement]) {
    for step in steps {
        println!("  [{}] {}. {}", step.phase.as_str().cyan(), step.order, step.text);
    }
}

/// Print the result of processing a transcript
pub fn display_run(run: &ComplianceRun) {
    print_header("Compliance Check");
    print_result("Evaluated at", &run.evaluated_at.to_rfc3339());
    print_result("Requirements evaluated", &run.requirements_evaluated.to_string());

    match &run.outcome {
        ComplianceOutcome::NoRequirements => {
            print_warning("No requirements found in database");
        }
        ComplianceOutcome::Completed { satisfied, unrecorded } => {
            print_satisfied(satisfied, unrecorded);
            print_success("Every requirement was resolved without clarification");
        }
        ComplianceOutcome::Escalated(escalation) => {
            print_satisfied(&escalation.satisfied, &escalation.unrecorded);
            print_warning(
                format!("Requirement needs clarification: {}", escalation.requirement).as_str()
            );
            print_header("Clarification");
            print_text(&escalation.clarification);
        }
    }
}

fn print_satisfied(satisfied: &[String], unrecorded: &[String]) {
    if satisfied.is_empty() {
        print_info("No requirements satisfied in this pass");
        return;
    }

    println!("{}", "Satisfied in this pass:".bold());
    for requirement in satisfied {
        if unrecorded.contains(requirement) {
            println!("  {} {} {}", "✓".green(), requirement, "(not recorded)".yellow());
        } else {
            println!("  {} {}", "✓".green(), requirement);
        }
    }
}

/// Get a transcript from the user
pub fn get_transcript() -> std::io::Result<String> {
    let mut lines = Vec::new();

    println!("Enter the conversation (empty line to finish):");
    loop {
        let line: String = Input::with_theme(&get_theme())
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        if line.is_empty() {
            break;
        }

        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// Confirm an action with the user
pub fn confirm_action(prompt: &str) -> std::io::Result<bool> {
    Confirm::with_theme(&get_theme())
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
