//! Session start rules
//!
//! Prints the mandatory rules banner at session start, followed by the full
//! research rule document shipped with the plugin.

use std::fs;
use std::path::{Path, PathBuf};

use super::{HookEvent, HookHandler, HookInput, HookResult};

/// Rules document, relative to the plugin root
pub const RESEARCH_RULES_PATH: &str = "rules/research.md";

const BANNER: &str = r#"
╔══════════════════════════════════════════════════════════════╗
║                    COZE TOOLKIT ACTIVE                       ║
║                  MANDATORY RULES LOADED                      ║
╚══════════════════════════════════════════════════════════════╝

RULE 1: RESEARCH PROOF REQUIRED
- Every claim needs SOURCE + EVIDENCE + CONCLUSION
- Never say "probably" or "likely" without proof
- If you didn't find it, say "Not found" - don't imagine

RULE 2: CONFIRMATION BEFORE ACTION
- Show plan before writing code
- Present options before deep diving
- Ask before modifying files

RULE 3: PROTECTED FILES BLOCKED
- .env, credentials, secrets → Always blocked
- User must explicitly confirm protected file changes

These rules are ENFORCED by hooks and cannot be bypassed.
"#;

/// Session rules hook handler
pub struct SessionRules {
    enabled: bool,
    plugin_root: PathBuf,
}

impl SessionRules {
    pub fn new(enabled: bool, plugin_root: PathBuf) -> Self {
        Self { enabled, plugin_root }
    }

    fn rules_text(&self) -> String {
        let mut text = BANNER.to_string();
        if let Some(research) = read_optional(&self.plugin_root.join(RESEARCH_RULES_PATH)) {
            text.push_str("\n--- FULL RESEARCH RULE ---\n");
            text.push_str(&research);
        }
        text
    }
}

/// Read a file that is allowed to be missing
fn read_optional(path: &Path) -> Option<String> {
    if !path.is_file() {
        log::debug!("Optional file not present: {}", path.display());
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

impl HookHandler for SessionRules {
    fn name(&self) -> &'static str {
        "session-rules"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::SessionStart
    }

    fn handle(&self, _event: HookEvent, _input: &HookInput) -> HookResult {
        HookResult::Inject {
            context: self.rules_text(),
        }
    }

    fn reads_input(&self) -> bool {
        false
    }
}
