//! Check a tool call against the PreToolUse gates

use colored::*;
use eyre::Result;

use crate::config::Config;
use crate::hook::dispatch::{dispatch, pre_tool_gates};
use crate::hook::{HookEvent, HookInput, HookResult};

/// Exit code when a gate blocks
const EXIT_BLOCKED: i32 = 2;

pub fn run(
    tool: &str,
    command: Option<&str>,
    file: Option<&str>,
    content: Option<&str>,
    config: &Config,
) -> Result<()> {
    let mut tool_input = serde_json::Map::new();
    if let Some(command) = command {
        tool_input.insert("command".to_string(), command.into());
    }
    if let Some(file) = file {
        tool_input.insert("file_path".to_string(), file.into());
    }
    if let Some(content) = content {
        tool_input.insert("content".to_string(), content.into());
    }

    let payload = serde_json::json!({
        "tool_name": tool,
        "tool_input": tool_input,
    });
    let input = HookInput::from_value(&payload);

    let gates = pre_tool_gates(config);
    let (result, blocked_by) = dispatch(HookEvent::PreToolUse, &input, &gates);

    let subject = command.or(file).unwrap_or("");
    match result {
        HookResult::Block { message } => {
            println!("{} Blocked by {}", "✗".red(), blocked_by.unwrap_or("unknown").bold());
            println!();
            println!("{}", message);
            println!();
            println!("{}: {}", tool.cyan(), subject.dimmed());
            std::process::exit(EXIT_BLOCKED);
        }
        _ => {
            println!("{} Allowed by {} gate(s)", "✓".green(), gates.len());
            println!();
            println!("{}: {}", tool.cyan(), subject.dimmed());
        }
    }

    Ok(())
}
