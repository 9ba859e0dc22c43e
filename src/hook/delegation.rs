//! Delegation enforcement hook
//!
//! Code edits are reserved for dev agents. A tech-lead session must delegate
//! code changes; a dev agent unlocks editing by writing the dev-mode marker
//! file at the project root. Role identity is never visible to hooks, so the
//! marker's existence is the only signal.

use std::path::{Path, PathBuf};

use super::{BlockStyle, HookEvent, HookHandler, HookInput, HookResult};
use crate::project::{self, DEV_MODE_FILE};

/// Paths that never need the marker, including the marker itself
const ALWAYS_ALLOWED: &[&str] = &[
    ".claude/tasks/",
    ".claude/s-config.json",
    DEV_MODE_FILE,
    "TRACKER.md",
    "CLAUDE.md",
    "README.md",
];

/// Extensions treated as code (lowercase, no dot)
const CODE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", // JavaScript / TypeScript
    "py", "pyw", // Python
    "go", "rs", "rb", // Go, Rust, Ruby
    "java", "kt", "scala", // JVM
    "c", "cpp", "h", "hpp", "cs", // C family
    "php", "swift", //
    "vue", "svelte", // Components
    "css", "scss", "sass", "less", // Styles
    "html", "htm", // Markup
    "json", "yaml", "yml", "toml", // Data / config
    "sql", //
    "sh", "bash", "zsh", // Shell
];

/// Delegation gate hook handler
pub struct DelegationGate {
    enabled: bool,
    cwd: PathBuf,
}

impl DelegationGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            cwd: project::current_dir(),
        }
    }

    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = cwd;
        self
    }

    fn validate_path(&self, file_path: &str) -> HookResult {
        if is_always_allowed(file_path) {
            log::debug!("Always-allowed path: {}", file_path);
            return HookResult::Allow;
        }

        if !is_code_file(file_path) {
            return HookResult::Allow;
        }

        let root = project::find_project_root(&self.cwd);
        if project::editing_unlocked(&root, &self.cwd) {
            log::debug!("Dev mode active under {}, allowing {}", root.display(), file_path);
            return HookResult::Allow;
        }

        HookResult::Block {
            message: block_reason(file_path),
        }
    }
}

fn is_always_allowed(file_path: &str) -> bool {
    ALWAYS_ALLOWED.iter().any(|pattern| file_path.contains(pattern))
}

fn is_code_file(file_path: &str) -> bool {
    Path::new(&file_path.to_lowercase())
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CODE_EXTENSIONS.contains(&ext))
}

fn block_reason(file_path: &str) -> String {
    format!(
        "BLOCKED: Code editing requires dev mode.\n\n\
         File: {file_path}\n\n\
         If you are TECH-LEAD:\n  \
         You cannot edit code files directly. Spawn a dev agent instead:\n\n  \
         Task tool:\n  \
         - subagent_type: \"general-purpose\"\n  \
         - prompt: \"You are a dev agent. First, create file {marker} with content 'dev'. Then implement: [task details]\"\n  \
         - description: \"TASK-XXX: [name]\"\n\n\
         If you are DEV agent:\n  \
         Create the marker file first:\n  \
         Write tool: {marker} with content \"dev\"\n\n  \
         Then you can edit code files.",
        file_path = file_path,
        marker = DEV_MODE_FILE,
    )
}

impl HookHandler for DelegationGate {
    fn name(&self) -> &'static str {
        "delegation"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::PreToolUse
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        if !input.tool.is_file_write() {
            return HookResult::Allow;
        }

        let file_path = input.file_path();
        if file_path.is_empty() {
            return HookResult::Allow;
        }

        self.validate_path(file_path)
    }

    fn block_style(&self) -> BlockStyle {
        BlockStyle::Legacy
    }
}
