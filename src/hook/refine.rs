//! Prompt refinement hook
//!
//! When the user invokes one of the role commands (`/s:dev`, `/s:ba`, ...)
//! with real arguments, instructs the agent to rewrite the request, show it
//! to the user and wait for confirmation before running the command. The
//! confirm/modify loop lives entirely in the injected instructions.

use lazy_regex::regex_captures;

use super::{HookEvent, HookHandler, HookInput, HookResult};

/// Commands that run an LLM role workflow and get refined
const ROLE_COMMANDS: &[&str] = &["s:ba", "s:dev", "s:design", "s:tech-lead"];

/// Commands that do their own refinement
const SKIP_COMMANDS: &[&str] = &["s:refine", "s:config"];

/// Confirmation replies that are never refined
const SKIP_REPLIES: &[&str] = &[
    "yes",
    "no",
    "ok",
    "approved",
    "confirm",
    "cancel",
    "y",
    "n",
    "done",
    "skip",
    "continue",
    "stop",
    "proceed",
    "looks good",
    "lgtm",
];

/// Prompts and arguments shorter than this are left alone
const MIN_LEN: usize = 5;

/// Prompt refinement hook handler
pub struct PromptRefiner {
    enabled: bool,
}

impl PromptRefiner {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn refine(&self, prompt: &str) -> HookResult {
        let prompt = prompt.trim();
        let lowered = prompt.to_lowercase();

        if SKIP_REPLIES.contains(&lowered.as_str()) || lowered.chars().count() < MIN_LEN {
            return HookResult::Allow;
        }

        let Some((command, args)) = parse_command(prompt) else {
            return HookResult::Allow;
        };

        if SKIP_COMMANDS.contains(&command.as_str()) {
            log::debug!("/{} handles its own refinement", command);
            return HookResult::Allow;
        }

        if !ROLE_COMMANDS.contains(&command.as_str()) || args.chars().count() < MIN_LEN {
            return HookResult::Allow;
        }

        HookResult::Inject {
            context: refinement(&command, args),
        }
    }
}

/// Split `/s:name rest` into the lowercased command and trimmed arguments
fn parse_command(prompt: &str) -> Option<(String, &str)> {
    let (_, command, args) = regex_captures!(r"(?is)^/(s:[a-z-]+)\s*(.*)", prompt)?;
    Some((command.to_lowercase(), args.trim()))
}

fn refinement(command: &str, args: &str) -> String {
    format!(
        r#"[COZE PROMPT REFINEMENT]

**Command detected:** /{command}
**Arguments:** {args}

Before executing, you MUST:

1. **Analyze the arguments** and identify:
   - Main intent/goal
   - Any ambiguities or missing details
   - Implicit requirements

2. **Create enhanced arguments** that:
   - Correct any grammar/spelling issues
   - Add specific details and context
   - Clarify scope and expected output

3. **Present to user**:

---
**Command:** /{command}

**Original:** {args}

**Enhanced:**
[Your refined, detailed version of the arguments]

**Added clarifications:**
- [What you added/clarified]
---

4. **Ask confirmation** using AskUserQuestion:
   - "Proceed with this enhanced request?"
   - Options: "Yes, proceed" / "No, let me modify"

5. **If the user chooses to modify**, apply their feedback, present the
   updated version again, and ask again. Repeat until confirmed.

6. **Only execute** the /{command} workflow AFTER user confirms.

[END REFINEMENT]
"#
    )
}

impl HookHandler for PromptRefiner {
    fn name(&self) -> &'static str {
        "refine"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && event == HookEvent::UserPromptSubmit
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        self.refine(&input.prompt)
    }
}
