//! Skill context hook
//!
//! Role-scoped variant of prompt handling: injects the best keyword-matched
//! skill documents for the role the hook was installed for.

use std::path::PathBuf;

use super::{HookEvent, HookHandler, HookInput, HookResult};
use crate::skill::Role;
use crate::skill::index::{SkillIndex, render_context};

/// Skill context hook handler
pub struct SkillContext {
    enabled: bool,
    role: Option<Role>,
    plugin_root: PathBuf,
}

impl SkillContext {
    /// `role` is the raw command-line argument; anything unrecognised makes
    /// the hook a no-op.
    pub fn new(enabled: bool, role: Option<&str>, plugin_root: PathBuf) -> Self {
        let role = role.and_then(Role::parse);
        if role.is_none() {
            log::debug!("Skill hook invoked without a valid role");
        }
        Self {
            enabled,
            role,
            plugin_root,
        }
    }

    fn inject(&self, role: Role, prompt: &str) -> HookResult {
        let index = match SkillIndex::load(&self.plugin_root) {
            Ok(index) => index,
            Err(e) => {
                return HookResult::Indeterminate {
                    message: format!("{:#}", e),
                };
            }
        };

        let Some(role_skills) = index.role(role) else {
            return HookResult::Allow;
        };

        let matches = role_skills.match_prompt(prompt);
        if matches.is_empty() {
            return HookResult::Allow;
        }

        for m in matches.iter() {
            log::debug!("Skill '{}' scored {} ({:?})", m.skill.name, m.score, m.matched_keywords);
        }

        match render_context(&self.plugin_root, &role_skills.display_name(role), &matches) {
            Some(context) => HookResult::Inject { context },
            None => HookResult::Allow,
        }
    }
}

impl HookHandler for SkillContext {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn handles(&self, event: HookEvent) -> bool {
        self.enabled && self.role.is_some() && event == HookEvent::UserPromptSubmit
    }

    fn handle(&self, _event: HookEvent, input: &HookInput) -> HookResult {
        let Some(role) = self.role else {
            return HookResult::Allow;
        };

        if input.prompt.is_empty() {
            return HookResult::Allow;
        }

        self.inject(role, &input.prompt)
    }
}
