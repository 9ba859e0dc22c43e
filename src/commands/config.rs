use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;
use crate::project;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "coze-hooks Configuration".bold());
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "paths".cyan());
            println!("  plugin_root: {}", project::plugin_root(config).display());
            println!();

            let hooks = &config.hooks;
            println!("{}:", "hooks".cyan());
            for (name, enabled) in [
                ("dev_commands", hooks.dev_commands),
                ("delegation", hooks.delegation),
                ("task_files", hooks.task_files),
                ("protect", hooks.protect),
                ("research", hooks.research),
                ("refine", hooks.refine),
                ("skills", hooks.skills),
                ("session_rules", hooks.session_rules),
            ] {
                let state = if enabled { "enabled".green() } else { "disabled".dimmed() };
                println!("  {}: {}", name, state);
            }
            println!();

            let rules = &config.rules;
            println!("{}:", "rules".cyan());
            println!(
                "  dev_commands.extra_patterns: {}",
                rules.dev_commands.extra_patterns.len()
            );
            println!("  protect.extra_paths: {}", rules.protect.extra_paths.len());
            println!("  protect.extra_commands: {}", rules.protect.extra_commands.len());
        }
    }

    Ok(())
}
