//! Research proof reminder hook
//!
//! After every read or search tool call, reminds the agent that findings
//! must be reported with a source, quoted evidence and a conclusion. Pure
//! context injection; never blocks.

use super::{HookEvent, HookHandler, HookInput, HookResult, Tool};

/// Research reminder hook handler
pub struct ResearchReminder {
    enabled: bool,
}

impl ResearchReminder {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

/// Tools whose output counts as research
fn is_research_tool(tool: &Tool) -> bool {
    matches!(
        tool,
        Tool::Read | Tool::Glob | Tool::Grep | Tool::WebSearch | Tool::WebFetch
    )
}

fn reminder(tool_name: &str) -> String {
    format!(
        r#"
[RESEARCH RULE REMINDER]
You just used {tool_name}. When reporting findings, you MUST:

1. Show SOURCE: file:line or URL
2. Show EVIDENCE: actual quote/code
3. Show CONCLUSION: your interpretation

Format:
## Finding: [What you discovered]
**Source:** [exact location]
**Evidence:**
> [actual content you found]
**Conclusion:** [your interpretation]

❌ NEVER say "probably", "likely", "I assume" without evidence
✅ ALWAYS cite what you actually found

[END REMINDER]
"#
    )
}

impl HookHandler for ResearchReminder {
    fn name(&self) -> &'static str {
        "research"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::PostToolUse
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        if !is_research_tool(&input.tool) {
            return HookResult::Allow;
        }

        HookResult::Inject {
            context: reminder(input.tool.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_payload(tool: &str) -> HookInput {
        HookInput::from_value(&json!({
            "tool_name": tool,
            "tool_input": {"file_path": "/src/lib.rs"},
            "tool_output": "pub fn main() {}"
        }))
    }

    #[test]
    fn test_injects_for_research_tools() {
        let hook = ResearchReminder::new(true);
        for tool in ["Read", "Glob", "Grep", "WebSearch", "WebFetch"] {
            match hook.handle(HookEvent::PostToolUse, &make_payload(tool)) {
                HookResult::Inject { context } => {
                    assert!(context.contains(&format!("You just used {}.", tool)));
                    assert!(context.contains("[RESEARCH RULE REMINDER]"));
                    assert!(context.contains("[END REMINDER]"));
                }
                other => panic!("expected inject for {}, got {:?}", tool, other),
            }
        }
    }

    #[test]
    fn test_silent_for_other_tools() {
        let hook = ResearchReminder::new(true);
        for tool in ["Bash", "Edit", "Write", "", "Task"] {
            assert_eq!(hook.handle(HookEvent::PostToolUse, &make_payload(tool)), HookResult::Allow);
        }
    }

    #[test]
    fn test_only_handles_post_tool_use() {
        let hook = ResearchReminder::new(true);
        assert!(hook.handles(HookEvent::PostToolUse));
        assert!(!hook.handles(HookEvent::PreToolUse));
    }

    #[test]
    fn test_disabled_reminder() {
        let hook = ResearchReminder::new(false);
        assert!(!hook.handles(HookEvent::PostToolUse));
    }
}
