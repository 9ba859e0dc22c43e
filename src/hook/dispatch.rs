//! Hook construction and chained dispatch

use std::path::PathBuf;

use super::delegation::DelegationGate;
use super::dev_commands::DevCommandBlocker;
use super::refine::PromptRefiner;
use super::research::ResearchReminder;
use super::security::ProtectGuard;
use super::session::SessionRules;
use super::skills::SkillContext;
use super::tasks::TaskFileGovernor;
use super::{HookEvent, HookHandler, HookInput, HookResult};
use crate::cli::HookName;
use crate::config::Config;

/// Build the handler for one hook, wired from config
pub fn build(name: HookName, role: Option<&str>, config: &Config, plugin_root: PathBuf) -> Box<dyn HookHandler> {
    let hooks = &config.hooks;
    match name {
        HookName::DevCommands => Box::new(
            DevCommandBlocker::new(hooks.dev_commands).with_extra_patterns(&config.rules.dev_commands.extra_patterns),
        ),
        HookName::Delegation => Box::new(DelegationGate::new(hooks.delegation)),
        HookName::TaskFiles => Box::new(TaskFileGovernor::new(hooks.task_files)),
        HookName::Protect => Box::new(ProtectGuard::new(hooks.protect).with_rules(&config.rules.protect)),
        HookName::Research => Box::new(ResearchReminder::new(hooks.research)),
        HookName::Refine => Box::new(PromptRefiner::new(hooks.refine)),
        HookName::Skills => Box::new(SkillContext::new(hooks.skills, role, plugin_root)),
        HookName::SessionRules => Box::new(SessionRules::new(hooks.session_rules, plugin_root)),
    }
}

/// Every PreToolUse gate, guards first
pub fn pre_tool_gates(config: &Config) -> Vec<Box<dyn HookHandler>> {
    [
        HookName::Protect,
        HookName::DevCommands,
        HookName::Delegation,
        HookName::TaskFiles,
    ]
    .into_iter()
    .map(|name| build(name, None, config, PathBuf::new()))
    .collect()
}

/// Dispatch a hook event to all registered handlers.
///
/// The first block wins and is returned with the name of the handler that
/// produced it. Indeterminate results are logged and skipped.
pub fn dispatch(
    event: HookEvent,
    input: &HookInput,
    handlers: &[Box<dyn HookHandler>],
) -> (HookResult, Option<&'static str>) {
    for handler in handlers.iter().filter(|h| h.handles(event)) {
        let result = handler.handle(event, input);
        if result.is_block() {
            log::info!("Hook {} blocked {}", handler.name(), input.tool.name());
            return (result, Some(handler.name()));
        }
        if let HookResult::Indeterminate { message } = &result {
            // Skipped; the remaining gates still run
            log::error!("Hook {} error: {}", handler.name(), message);
        }
    }

    (HookResult::Allow, None)
}
