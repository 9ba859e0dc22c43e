//! Protected path and dangerous command hook
//!
//! Blocks writes to sensitive files and destructive shell commands before
//! they execute. Pure blacklist: nothing here ever grants access.

use once_cell::sync::Lazy;

use super::rules::RuleTable;
use super::{HookEvent, HookHandler, HookInput, HookResult, Tool};
use crate::config::ProtectRules;

/// Path fragments that need explicit user approval (case-insensitive)
const PROTECTED_PATHS: &[&str] = &[
    ".env",
    "credentials",
    "secret",
    "password",
    "api_key",
    "token",
    ".git/",
    "node_modules/",
    "package-lock.json",
];

/// Destructive shell idioms (case-sensitive)
const DANGEROUS_COMMANDS: &[&str] = &[
    "rm -rf",
    "rm -r /",
    "> /dev/",
    "dd if=",
    "mkfs",
    ":(){",
    "chmod 777",
    "curl | sh",
    "curl | bash",
    "wget | sh",
    "wget | bash",
];

static PROTECTED_PATH_RULES: Lazy<RuleTable> = Lazy::new(|| RuleTable::substrings(PROTECTED_PATHS, false));
static DANGEROUS_COMMAND_RULES: Lazy<RuleTable> = Lazy::new(|| RuleTable::substrings(DANGEROUS_COMMANDS, true));

/// Protected path guard hook handler
pub struct ProtectGuard {
    enabled: bool,
    paths: RuleTable,
    commands: RuleTable,
}

impl ProtectGuard {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            paths: PROTECTED_PATH_RULES.clone(),
            commands: DANGEROUS_COMMAND_RULES.clone(),
        }
    }

    pub fn with_rules(mut self, rules: &ProtectRules) -> Self {
        self.paths.extend_substrings(&rules.extra_paths, false);
        self.commands.extend_substrings(&rules.extra_commands, true);
        self
    }

    fn validate_path(&self, file_path: &str) -> HookResult {
        match self.paths.first_match(file_path) {
            Some(rule) => HookResult::Block {
                message: format!(
                    "🚫 BLOCKED: Cannot modify '{}' files. This is a protected path.\n\
                     Path: {}\n\
                     Ask user for explicit permission first.",
                    rule.label, file_path
                ),
            },
            None => HookResult::Allow,
        }
    }

    fn validate_command(&self, command: &str) -> HookResult {
        match self.commands.first_match(command) {
            Some(rule) => HookResult::Block {
                message: format!(
                    "🚫 BLOCKED: Dangerous command pattern '{}' detected.\n\
                     Command: {}\n\
                     This requires explicit user confirmation.",
                    rule.label, command
                ),
            },
            None => HookResult::Allow,
        }
    }
}

impl HookHandler for ProtectGuard {
    fn name(&self) -> &'static str {
        "protect"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::PreToolUse
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        match input.tool {
            Tool::Edit | Tool::Write => self.validate_path(input.file_path()),
            Tool::Bash => self.validate_command(input.command()),
            _ => HookResult::Allow,
        }
    }
}
