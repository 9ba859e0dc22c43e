//! Hook event handling
//!
//! Hooks are events fired by Claude Code that coze-hooks can intercept.
//! Every handler is a pure function from one decoded [`HookInput`] to one
//! [`HookResult`]; the envelope turns that result into the stdout shape the
//! host expects.

use serde::{Deserialize, Serialize};

pub mod delegation;
pub mod dev_commands;
pub mod dispatch;
pub mod envelope;
pub mod refine;
pub mod research;
pub mod rules;
pub mod security;
pub mod session;
pub mod skills;
pub mod tasks;

/// Hook event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
    SessionStart,
    UserPromptSubmit,
}

impl HookEvent {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "pretooluse" => Some(Self::PreToolUse),
            "posttooluse" => Some(Self::PostToolUse),
            "sessionstart" => Some(Self::SessionStart),
            "userpromptsubmit" => Some(Self::UserPromptSubmit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::SessionStart => "SessionStart",
            Self::UserPromptSubmit => "UserPromptSubmit",
        }
    }
}

/// Tool named in the hook payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    Bash,
    Edit,
    Write,
    Read,
    Glob,
    Grep,
    WebSearch,
    WebFetch,
    Other(String),
    /// Prompt and session events carry no tool
    None,
}

impl Tool {
    pub fn parse(name: &str) -> Self {
        match name {
            "" => Self::None,
            "Bash" => Self::Bash,
            "Edit" => Self::Edit,
            "Write" => Self::Write,
            "Read" => Self::Read,
            "Glob" => Self::Glob,
            "Grep" => Self::Grep,
            "WebSearch" => Self::WebSearch,
            "WebFetch" => Self::WebFetch,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bash => "Bash",
            Self::Edit => "Edit",
            Self::Write => "Write",
            Self::Read => "Read",
            Self::Glob => "Glob",
            Self::Grep => "Grep",
            Self::WebSearch => "WebSearch",
            Self::WebFetch => "WebFetch",
            Self::Other(name) => name,
            Self::None => "",
        }
    }

    /// Edit or Write
    pub fn is_file_write(&self) -> bool {
        matches!(self, Self::Edit | Self::Write)
    }
}

/// One decoded hook invocation.
///
/// Built leniently: absent or wrongly typed fields become empty values so a
/// malformed payload degrades to "no opinion" instead of an error.
#[derive(Debug, Clone)]
pub struct HookInput {
    pub tool: Tool,
    pub tool_input: serde_json::Value,
    pub prompt: String,
    pub event_name: Option<String>,
}

impl HookInput {
    pub fn from_value(payload: &serde_json::Value) -> Self {
        let tool_name = payload.get("tool_name").and_then(|v| v.as_str()).unwrap_or("");
        let tool_input = payload
            .get("tool_input")
            .filter(|v| v.is_object())
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let prompt = payload.get("prompt").and_then(|v| v.as_str()).unwrap_or("");
        let event_name = payload
            .get("hook_event_name")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Self {
            tool: Tool::parse(tool_name),
            tool_input,
            prompt: prompt.to_string(),
            event_name,
        }
    }

    /// Empty input, used by hooks that read nothing from stdin
    pub fn empty() -> Self {
        Self::from_value(&serde_json::Value::Null)
    }

    fn input_str(&self, key: &str) -> &str {
        self.tool_input.get(key).and_then(|v| v.as_str()).unwrap_or("")
    }

    /// `tool_input.command` for Bash
    pub fn command(&self) -> &str {
        self.input_str("command")
    }

    /// `tool_input.file_path` for Edit/Write
    pub fn file_path(&self) -> &str {
        self.input_str("file_path")
    }

    /// `tool_input.content` for Write
    pub fn content(&self) -> &str {
        self.input_str("content")
    }
}

/// Result of a hook handler
#[derive(Debug, Clone, PartialEq)]
pub enum HookResult {
    /// Allow the action to proceed silently
    Allow,
    /// Allow, appending text to the agent's context
    Inject { context: String },
    /// Block the action
    Block { message: String },
    /// The handler could not decide; resolved to allow by the envelope
    Indeterminate { message: String },
}

impl HookResult {
    pub fn is_block(&self) -> bool {
        matches!(self, HookResult::Block { .. })
    }
}

/// How a block is written back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `{"decision": "block", "reason": ...}`
    Legacy,
    /// `{"hookSpecificOutput": {"permissionDecision": "deny", ...}}`
    Permission,
}

/// A hook handler
pub trait HookHandler {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;
    fn handles(&self, event: HookEvent) -> bool;
    fn handle(&self, event: HookEvent, input: &HookInput) -> HookResult;

    fn block_style(&self) -> BlockStyle {
        BlockStyle::Permission
    }

    /// Whether the envelope should read a payload from stdin
    fn reads_input(&self) -> bool {
        true
    }
}
