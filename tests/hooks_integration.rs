//! Integration tests for the hook binary
//!
//! Each test runs `coze-hooks hook <name>` as the agent host would: payload
//! on stdin, verdict on stdout, exit code always 0.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Isolated project + plugin layout
struct Sandbox {
    project: TempDir,
    plugin: TempDir,
    data: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join(".git")).unwrap();
        Self {
            project,
            plugin: TempDir::new().unwrap(),
            data: TempDir::new().unwrap(),
        }
    }

    fn project(&self) -> &Path {
        self.project.path()
    }

    fn plugin(&self) -> &Path {
        self.plugin.path()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_coze-hooks"));
        cmd.args(args)
            .current_dir(self.project())
            .env("CLAUDE_PLUGIN_ROOT", self.plugin())
            .env("COZE_HOOKS_CONFIG", self.plugin().join("coze-hooks.yaml"))
            .env("XDG_DATA_HOME", self.data.path())
            .env("HOME", self.data.path())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run a hook with `stdin` as the payload
    fn hook(&self, args: &[&str], stdin: &str) -> Output {
        let mut full = vec!["hook"];
        full.extend_from_slice(args);

        let mut child = self
            .command(&full)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn coze-hooks");

        child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
        child.wait_with_output().expect("Failed to wait for coze-hooks")
    }

    fn hook_json(&self, args: &[&str], payload: Value) -> Output {
        self.hook(args, &payload.to_string())
    }

    fn write_skill_index(&self, index: Value, docs: &[(&str, &str)]) {
        let skills = self.plugin().join("skills");
        fs::create_dir_all(&skills).unwrap();
        fs::write(skills.join("skill-index.json"), index.to_string()).unwrap();
        for (path, content) in docs {
            let file = skills.join(path);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn assert_silent_allow(output: &Output) {
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(output).trim().is_empty(), "unexpected stdout: {}", stdout(output));
}

fn bash(command: &str) -> Value {
    json!({
        "hook_event_name": "PreToolUse",
        "tool_name": "Bash",
        "tool_input": { "command": command }
    })
}

fn write(file_path: &str, content: &str) -> Value {
    json!({
        "hook_event_name": "PreToolUse",
        "tool_name": "Write",
        "tool_input": { "file_path": file_path, "content": content }
    })
}

#[test]
fn test_empty_and_malformed_input_is_neutral() {
    let sandbox = Sandbox::new();
    for name in ["dev-commands", "delegation", "task-files", "protect", "research", "refine"] {
        assert_silent_allow(&sandbox.hook(&[name], ""));
        assert_silent_allow(&sandbox.hook(&[name], "{not json"));
    }
    assert_silent_allow(&sandbox.hook(&["skills", "dev"], ""));
}

#[test]
fn test_dev_server_command_is_blocked_with_legacy_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.hook_json(&["dev-commands"], bash("npm run dev"));

    assert_eq!(output.status.code(), Some(0));
    let verdict = stdout_json(&output);
    assert_eq!(verdict["decision"], "block");
    let reason = verdict["reason"].as_str().unwrap();
    assert!(reason.contains("npm run dev"));
    assert!(reason.contains("npm run build"));
}

#[test]
fn test_build_commands_pass_dev_blocker() {
    let sandbox = Sandbox::new();
    for command in ["npm run build", "vite build", "cargo build --release", "ls -la"] {
        assert_silent_allow(&sandbox.hook_json(&["dev-commands"], bash(command)));
    }
}

#[test]
fn test_delegation_blocks_code_until_dev_mode() {
    let sandbox = Sandbox::new();
    let payload = json!({
        "hook_event_name": "PreToolUse",
        "tool_name": "Edit",
        "tool_input": { "file_path": "src/app.ts" }
    });

    let output = sandbox.hook_json(&["delegation"], payload.clone());
    let verdict = stdout_json(&output);
    assert_eq!(verdict["decision"], "block");
    assert!(verdict["reason"].as_str().unwrap().contains("src/app.ts"));

    fs::create_dir_all(sandbox.project().join(".claude")).unwrap();
    fs::write(sandbox.project().join(".claude/.dev-mode"), "dev").unwrap();
    assert_silent_allow(&sandbox.hook_json(&["delegation"], payload));
}

#[test]
fn test_delegation_ignores_docs_and_marker() {
    let sandbox = Sandbox::new();
    for path in ["README.md", "docs/notes.md", ".claude/.dev-mode"] {
        assert_silent_allow(&sandbox.hook_json(&["delegation"], write(path, "x")));
    }
}

#[test]
fn test_task_file_outside_tasks_dir_is_redirected() {
    let sandbox = Sandbox::new();
    let output = sandbox.hook_json(&["task-files"], write("TASK-001-login.md", "# Task"));

    let verdict = stdout_json(&output);
    let decision = &verdict["hookSpecificOutput"];
    assert_eq!(decision["hookEventName"], "PreToolUse");
    assert_eq!(decision["permissionDecision"], "deny");
    let reason = decision["permissionDecisionReason"].as_str().unwrap();
    assert!(reason.contains(".claude/tasks/TASK-001-login.md"));
    assert!(sandbox.project().join(".claude/tasks").is_dir());
}

#[test]
fn test_task_file_sections_are_enforced() {
    let sandbox = Sandbox::new();
    let path = ".claude/tasks/TASK-002-api.md";

    let output = sandbox.hook_json(&["task-files"], write(path, "# TASK-002\n\n## Assignment\n"));
    let verdict = stdout_json(&output);
    let reason = verdict["hookSpecificOutput"]["permissionDecisionReason"].as_str().unwrap();
    assert!(reason.contains("Report, Review"));

    let complete = "# TASK-002\n\n## Assignment\n\n## Report\n\n## Review\n";
    assert_silent_allow(&sandbox.hook_json(&["task-files"], write(path, complete)));
}

#[test]
fn test_protect_blocks_env_files_and_dangerous_commands() {
    let sandbox = Sandbox::new();

    let output = sandbox.hook_json(&["protect"], write(".env", "SECRET=1"));
    let verdict = stdout_json(&output);
    assert_eq!(verdict["hookSpecificOutput"]["permissionDecision"], "deny");
    assert!(
        verdict["hookSpecificOutput"]["permissionDecisionReason"]
            .as_str()
            .unwrap()
            .contains(".env")
    );

    let output = sandbox.hook_json(&["protect"], bash("rm -rf /"));
    assert_eq!(stdout_json(&output)["hookSpecificOutput"]["permissionDecision"], "deny");

    assert_silent_allow(&sandbox.hook_json(&["protect"], write("src/env.rs", "")));
}

#[test]
fn test_protect_uses_configured_extra_paths() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.plugin().join("coze-hooks.yaml"),
        "rules:\n  protect:\n    extra_paths:\n      - vault/\n",
    )
    .unwrap();

    let output = sandbox.hook_json(&["protect"], write("infra/vault/db.yaml", ""));
    assert_eq!(stdout_json(&output)["hookSpecificOutput"]["permissionDecision"], "deny");
}

#[test]
fn test_disabled_hook_is_silent() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.plugin().join("coze-hooks.yaml"), "hooks:\n  dev_commands: false\n").unwrap();
    assert_silent_allow(&sandbox.hook_json(&["dev-commands"], bash("npm run dev")));
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.plugin().join("coze-hooks.yaml"), "hooks: [not, a, map").unwrap();

    let output = sandbox.hook_json(&["dev-commands"], bash("npm run dev"));
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["decision"], "block");
}

#[test]
fn test_research_reminder_after_read() {
    let sandbox = Sandbox::new();
    let payload = json!({
        "hook_event_name": "PostToolUse",
        "tool_name": "Grep",
        "tool_input": { "pattern": "fn main" }
    });

    let output = sandbox.hook_json(&["research"], payload);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("You just used Grep."));

    let payload = json!({ "hook_event_name": "PostToolUse", "tool_name": "Bash" });
    assert_silent_allow(&sandbox.hook_json(&["research"], payload));
}

#[test]
fn test_hook_registered_under_other_event_still_applies() {
    let sandbox = Sandbox::new();
    let payload = json!({ "hook_event_name": "PreToolUse", "tool_name": "Read" });

    let output = sandbox.hook_json(&["research"], payload);
    assert!(stdout(&output).contains("You just used Read."));
}

#[test]
fn test_chained_dev_server_after_build_is_blocked() {
    let sandbox = Sandbox::new();
    let output = sandbox.hook_json(&["dev-commands"], bash("npx vite build && npx vite"));
    assert_eq!(stdout_json(&output)["decision"], "block");
}

#[test]
fn test_refine_prompts_on_role_command() {
    let sandbox = Sandbox::new();
    let payload = json!({ "prompt": "/s:dev add a login page" });

    let output = sandbox.hook_json(&["refine"], payload);
    let text = stdout(&output);
    assert!(text.contains("s:dev"));
    assert!(text.contains("add a login page"));

    assert_silent_allow(&sandbox.hook_json(&["refine"], json!({ "prompt": "yes" })));
    assert_silent_allow(&sandbox.hook_json(&["refine"], json!({ "prompt": "/s:config" })));
}

#[test]
fn test_skills_injects_best_matches() {
    let sandbox = Sandbox::new();
    sandbox.write_skill_index(
        json!({
            "roles": {
                "dev": {
                    "name": "Developer",
                    "skills": [
                        { "name": "api-design", "path": "dev/api.md", "keywords": ["api", "endpoint"] },
                        { "name": "testing", "path": "dev/testing.md", "keywords": ["test"] },
                        { "name": "css", "path": "dev/css.md", "keywords": ["style"] }
                    ]
                }
            }
        }),
        &[
            ("dev/api.md", "Version every endpoint."),
            ("dev/testing.md", "Write the test first."),
            ("dev/css.md", "Prefer utility classes."),
        ],
    );

    let output = sandbox.hook_json(&["skills", "dev"], json!({ "prompt": "Add an API endpoint with a test" }));
    let text = stdout(&output);

    assert!(text.starts_with("[COZE DEVELOPER SKILL CONTEXT]"));
    assert!(text.contains("You are acting as a Developer."));
    let api = text.find("=== API-DESIGN ===").unwrap();
    let testing = text.find("=== TESTING ===").unwrap();
    assert!(api < testing);
    assert!(!text.contains("CSS"));

    assert_silent_allow(&sandbox.hook_json(&["skills", "dev"], json!({ "prompt": "nothing relevant" })));
    assert_silent_allow(&sandbox.hook_json(&["skills", "tester"], json!({ "prompt": "test" })));
    assert_silent_allow(&sandbox.hook_json(&["skills"], json!({ "prompt": "api" })));
}

#[test]
fn test_corrupt_skill_index_fails_open() {
    let sandbox = Sandbox::new();
    let skills = sandbox.plugin().join("skills");
    fs::create_dir_all(&skills).unwrap();
    fs::write(skills.join("skill-index.json"), "{ broken").unwrap();

    let output = sandbox.hook_json(&["skills", "dev"], json!({ "prompt": "api" }));
    assert_silent_allow(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[test]
fn test_session_rules_ignore_stdin() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.plugin().join("rules")).unwrap();
    fs::write(sandbox.plugin().join("rules/research.md"), "Cite every source.").unwrap();

    let output = sandbox.hook(&["session-rules"], "");
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("COZE TOOLKIT ACTIVE"));
    assert!(text.contains("--- FULL RESEARCH RULE ---"));
    assert!(text.contains("Cite every source."));
}

#[test]
fn test_check_command_exit_codes() {
    let sandbox = Sandbox::new();

    let blocked = sandbox
        .command(&["check", "--tool", "Bash", "--command", "npm start"])
        .output()
        .unwrap();
    assert_eq!(blocked.status.code(), Some(2));
    assert!(stdout(&blocked).contains("dev-commands"));

    let allowed = sandbox
        .command(&["check", "--tool", "Bash", "--command", "git status"])
        .output()
        .unwrap();
    assert_eq!(allowed.status.code(), Some(0));
}

#[test]
fn test_skill_match_json_report() {
    let sandbox = Sandbox::new();
    sandbox.write_skill_index(
        json!({
            "roles": {
                "dev": {
                    "skills": [
                        { "name": "testing", "path": "dev/testing.md", "keywords": ["test"] },
                        { "name": "api-design", "path": "dev/api.md", "keywords": ["api", "endpoint"] }
                    ]
                }
            }
        }),
        &[("dev/api.md", "Version every endpoint."), ("dev/testing.md", "Write the test first.")],
    );

    let output = sandbox
        .command(&["skill", "match", "dev", "test the api endpoint", "-o", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let report = stdout_json(&output);
    assert_eq!(report["role"], "dev");
    let matches = report["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["skill"]["name"], "api-design");
    assert_eq!(matches[0]["score"], 2);
    assert_eq!(matches[1]["matched_keywords"], json!(["test"]));
    assert!(report["context"].as_str().unwrap().starts_with("[COZE DEV SKILL CONTEXT]"));
}
