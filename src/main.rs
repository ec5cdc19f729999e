use clap::Parser;
use log::{ debug, error, info };
use anyhow::{ anyhow, Result };
use vigil::{ build_live_system, OutputFormat, RecoverableError, VigilError, VigilOptions };
use vigil::config;
use vigil::models;
use vigil::traits;
mod cli;
use cli::{ VigilCli, Commands };

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command line arguments
    let cli = VigilCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    // Load environment variables; a missing .env is fine
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let output_format = OutputFormat::parse(&cli.output_format).ok_or_else(||
        anyhow!("Unsupported output format: {}", cli.output_format)
    )?;
    let options = VigilOptions::load(cli.config.as_deref(), output_format)?;

    let system = match build_live_system(&options.services) {
        Ok(system) => system,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Process { file, text } => {
            cli::commands::process::execute(
                &system,
                file.as_deref(),
                text.as_deref(),
                options.output_format
            ).await
        }

        Commands::Mark { requirement } => {
            cli::commands::mark::execute(&system, requirement, options.output_format).await
        }

        Commands::List { phase } => {
            cli::commands::list::execute(&system, phase.as_deref(), options.output_format).await
        }

        Commands::Ingest { procedure, dry_run, yes } => {
            cli::commands::ingest::execute(
                &system,
                procedure,
                *dry_run,
                *yes,
                options.output_format
            ).await
        }
    };

    if let Err(e) = result {
        match e.downcast_ref::<VigilError>() {
            Some(vigil_error) => report(vigil_error),
            None => cli::ui::print_error(&e.to_string()),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn report(err: &VigilError) {
    error!("{} (severity: {:?})", err, err.severity());
    cli::ui::print_error(&err.to_string());
    if let Some(strategy) = err.recovery_strategy() {
        cli::ui::print_info(&strategy);
    }
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
