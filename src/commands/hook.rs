use eyre::{Context, Result};
use std::io::{self, Read, Write};

use crate::cli::HookName;
use crate::config::Config;
use crate::hook::{dispatch, envelope};
use crate::project;

/// Run one hook. Blocks are signalled on stdout, never through the exit code.
pub fn run(name: HookName, role: Option<&str>, config: &Config) -> Result<()> {
    let handler = dispatch::build(name, role, config, project::plugin_root(config));

    let raw = if handler.reads_input() {
        match read_stdin() {
            Ok(raw) => Some(raw),
            Err(e) => {
                log::warn!("{:#}", e);
                return Ok(());
            }
        }
    } else {
        None
    };

    log::info!("Running hook {:?}", name);

    if let Some(output) = envelope::process(handler.as_ref(), name.event(), raw.as_deref()) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", output).and_then(|_| stdout.flush()) {
            log::error!("Failed to write hook output: {}", e);
        }
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read payload from stdin")?;
    Ok(buffer)
}
