use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod hook;
mod project;
mod skill;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coze-hooks")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("coze-hooks.log");

    // Hook stdout is the protocol channel, so logs only go to the file
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).try_init()?;

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Hook { name, role } => commands::hook::run(name, role.as_deref(), &config),
        Commands::Check {
            tool,
            command,
            file,
            content,
        } => commands::check::run(&tool, command.as_deref(), file.as_deref(), content.as_deref(), &config),
        Commands::Skill { action } => commands::skill::run(action, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();
    let is_hook = matches!(cli.command, Commands::Hook { .. });

    // A broken config must not take the agent host down with it: hooks fall
    // back to defaults, everything else reports the error.
    let config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) if is_hook => {
            eprintln!("[coze-hooks config error: {:#}]", e);
            Config::default()
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    // Logging is best effort; a read-only home must not break a hook
    if let Err(e) = setup_logging(&config.log_level) {
        if !is_hook {
            eprintln!("Warning: {:#}", e);
        }
    }

    info!("Starting coze-hooks with config from: {:?}", cli.config);

    let result = run(cli, config);
    if is_hook {
        // Hooks exit 0 regardless; the verdict is on stdout
        if let Err(e) = result {
            log::error!("Hook failed: {:#}", e);
            eprintln!("[coze-hooks error: {:#}]", e);
        }
        return Ok(());
    }

    result.context("Command failed")
}
