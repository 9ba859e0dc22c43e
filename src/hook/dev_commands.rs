//! Dev server blocking hook
//!
//! Blocks Bash commands that start long-running dev servers or watchers.
//! An agent validating its own changes needs commands that terminate, so
//! these are rejected up front instead of being left to time out.
//!
//! The table is deny-only: a command is allowed simply by not matching.

use once_cell::sync::Lazy;

use super::rules::{Matcher, Rule, RuleTable};
use super::{BlockStyle, HookEvent, HookHandler, HookInput, HookResult, Tool};

/// Dev server and watch-mode patterns: (label, pattern, unless).
/// `unless` is matched against the text following each occurrence.
const DEV_SERVER_PATTERNS: &[(&str, &str, Option<&str>)] = &[
    // Node.js / JavaScript
    ("npm run dev", r"\bnpm\s+run\s+dev\b", None),
    ("npm start", r"\bnpm\s+start\b", None),
    ("next dev", r"\bnpx\s+next\s+dev\b", None),
    ("vite", r"\bnpx\s+vite\b", Some(r"^\s+build\b")),
    ("nuxt dev", r"\bnpx\s+nuxt\s+dev\b", None),
    ("yarn dev", r"\byarn\s+dev\b", None),
    ("yarn start", r"\byarn\s+start\b", None),
    ("pnpm dev", r"\bpnpm\s+dev\b", None),
    ("pnpm start", r"\bpnpm\s+start\b", None),
    ("bun dev", r"\bbun\s+dev\b", None),
    ("bun run dev", r"\bbun\s+run\s+dev\b", None),
    // Python
    ("runserver", r"\bpython.*\s+runserver\b", None),
    ("flask run", r"\bflask\s+run\b", None),
    ("uvicorn", r"\buvicorn\b", Some(r"^.*--help")),
    ("gunicorn", r"\bgunicorn\b", Some(r"^.*--help")),
    ("manage.py runserver", r"\bmanage\.py\s+runserver\b", None),
    // Go
    ("go run", r"\bgo\s+run\b", None),
    ("air", r"\bair\b", None),
    // Ruby
    ("rails server", r"\brails\s+server\b", None),
    ("rails s", r"\brails\s+s\b", None),
    // PHP
    ("artisan serve", r"\bphp\s+artisan\s+serve\b", None),
    ("php -S", r"\bphp\s+-S\b", None),
    // Rust
    ("cargo run", r"\bcargo\s+run\b", Some(r"^\s+--release\b")),
    ("cargo watch", r"\bcargo\s+watch\b", None),
    // Generic watchers
    ("nodemon", r"\bnodemon\b", None),
    ("ts-node-dev", r"\bts-node-dev\b", None),
    ("tsx watch", r"\btsx\s+watch\b", None),
];

/// Commands suggested in place of a dev server. Listed in the block reason
/// only; they are never consulted to grant access.
pub const BUILD_ALTERNATIVES: &[&str] = &[
    "npm run build",
    "npm run typecheck / npx tsc --noEmit",
    "npm test / go test / pytest",
];

static DEV_SERVER_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(
        DEV_SERVER_PATTERNS
            .iter()
            .filter_map(|(label, pattern, unless)| {
                let matcher = match unless {
                    Some(unless) => Matcher::regex_unless(pattern, unless),
                    None => Matcher::regex(pattern),
                };
                match matcher {
                    Ok(matcher) => Some(Rule::new(*label, matcher)),
                    Err(e) => {
                        log::error!("Invalid built-in dev server pattern {}: {}", pattern, e);
                        None
                    }
                }
            })
            .collect(),
    )
});

/// Dev server blocker hook handler
pub struct DevCommandBlocker {
    enabled: bool,
    rules: RuleTable,
}

impl DevCommandBlocker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            rules: DEV_SERVER_RULES.clone(),
        }
    }

    /// Add configured patterns after the built-in ones
    pub fn with_extra_patterns(mut self, patterns: &[String]) -> Self {
        self.rules.extend_regexes(patterns);
        log::trace!("{} dev server rules active", self.rules.len());
        self
    }

    fn validate_command(&self, command: &str) -> HookResult {
        match self.rules.first_match(command) {
            Some(rule) => {
                log::debug!("Dev server pattern '{}' matched: {}", rule.label, command);
                HookResult::Block {
                    message: block_reason(command),
                }
            }
            None => HookResult::Allow,
        }
    }
}

fn block_reason(command: &str) -> String {
    let alternatives: Vec<String> = BUILD_ALTERNATIVES.iter().map(|a| format!("- {}", a)).collect();
    format!(
        "BLOCKED: Dev server commands are not allowed.\n\n\
         Command: {}\n\n\
         Dev servers run indefinitely and cannot validate code.\n\
         Use build/test commands instead:\n\
         {}",
        command,
        alternatives.join("\n")
    )
}

impl HookHandler for DevCommandBlocker {
    fn name(&self) -> &'static str {
        "dev-commands"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::PreToolUse
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        if input.tool != Tool::Bash {
            return HookResult::Allow;
        }

        let command = input.command();
        if command.is_empty() {
            return HookResult::Allow;
        }

        self.validate_command(command)
    }

    fn block_style(&self) -> BlockStyle {
        BlockStyle::Legacy
    }
}
