//! Task file enforcement hook
//!
//! Task files (`task-NNN*.md`) and the tracker live in exactly one place:
//! `<project>/.claude/tasks/`. Writes elsewhere are redirected, and full
//! writes of task files must carry the Assignment, Report and Review
//! sections.

use lazy_regex::regex_is_match;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use super::{HookEvent, HookHandler, HookInput, HookResult, Tool};
use crate::project::{self, TASKS_DIR};

/// Tracker file name (exact match)
pub const TRACKER_FILE: &str = "TRACKER.md";

/// Sections every task file must contain
pub const REQUIRED_SECTIONS: &[&str] = &["Assignment", "Report", "Review"];

static SECTION_HEADINGS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    REQUIRED_SECTIONS
        .iter()
        .filter_map(|section| {
            Regex::new(&format!(r"(?mi)^#+\s*{}", regex::escape(section)))
                .ok()
                .map(|re| (*section, re))
        })
        .collect()
});

/// Task file governor hook handler
pub struct TaskFileGovernor {
    enabled: bool,
    cwd: PathBuf,
}

impl TaskFileGovernor {
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

    fn tasks_dir(&self) -> PathBuf {
        project::find_project_root(&self.cwd).join(TASKS_DIR)
    }

    fn validate(&self, tool: &Tool, file_path: &str, content: &str) -> HookResult {
        let tasks_dir = self.tasks_dir();
        ensure_dir(&tasks_dir);

        let target = project::absolutize(Path::new(file_path), &self.cwd);
        let target_dir = target.parent().map(Path::to_path_buf).unwrap_or_default();
        if target_dir != tasks_dir {
            let name = basename(file_path);
            let corrected = tasks_dir.join(name);
            return HookResult::Block {
                message: format!(
                    "📁 Task files must be in {}/\n\n\
                     Requested: {}\n\
                     Redirect to: {}\n\n\
                     Please use the correct path.",
                    TASKS_DIR,
                    file_path,
                    corrected.display()
                ),
            };
        }

        if *tool == Tool::Write && basename(file_path) != TRACKER_FILE {
            let missing = missing_sections(content);
            if !missing.is_empty() {
                let required: Vec<String> = REQUIRED_SECTIONS.iter().map(|s| format!("## {}", s)).collect();
                return HookResult::Block {
                    message: format!(
                        "📋 Task file missing required sections: {}\n\n\
                         File: {}\n\n\
                         Task files must include:\n{}",
                        missing.join(", "),
                        file_path,
                        required.join("\n")
                    ),
                };
            }
        }

        HookResult::Allow
    }
}

/// Create the task directory if needed. A failure here is logged; it never
/// decides the outcome.
fn ensure_dir(dir: &Path) {
    if dir.is_dir() {
        return;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => log::info!("Created directory: {}", dir.display()),
        Err(e) => log::warn!("Failed to create {}: {}", dir.display(), e),
    }
}

fn basename(file_path: &str) -> &str {
    Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_path)
}

/// Whether `file_path` names a task or tracker file
pub fn is_task_file(file_path: &str) -> bool {
    let name = basename(file_path);
    name == TRACKER_FILE || regex_is_match!(r"(?i)^task-\d{3}.*\.md$", name)
}

/// Required sections absent from `content`, in canonical order
pub fn missing_sections(content: &str) -> Vec<&'static str> {
    SECTION_HEADINGS
        .iter()
        .filter(|(_, re)| !re.is_match(content))
        .map(|(section, _)| *section)
        .collect()
}

impl HookHandler for TaskFileGovernor {
    fn name(&self) -> &'static str {
        "task-files"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::PreToolUse
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        if !input.tool.is_file_write() {
            return HookResult::Allow;
        }

        let file_path = input.file_path();
        if file_path.is_empty() || !is_task_file(file_path) {
            return HookResult::Allow;
        }

        self.validate(&input.tool, file_path, input.content())
    }
}
