use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::hook::HookEvent;
use crate::skill::Role;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "coze-hooks",
    about = "Policy-enforcement hooks for Claude Code",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/coze-hooks/logs/coze-hooks.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to coze-hooks.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a hook: reads the event payload on stdin, writes the verdict on stdout
    Hook {
        /// Hook to run
        #[arg(value_enum)]
        name: HookName,

        /// Role for the skills hook (dev, ba, design, pm, tester)
        role: Option<String>,
    },

    /// Run a tool call through every PreToolUse gate and show the verdict
    Check {
        /// Tool name (Bash, Edit, Write, ...)
        #[arg(long, short)]
        tool: String,

        /// Bash command
        #[arg(long)]
        command: Option<String>,

        /// Target file for Edit/Write
        #[arg(long)]
        file: Option<String>,

        /// File content for Write
        #[arg(long)]
        content: Option<String>,
    },

    /// Inspect the skill index
    Skill {
        #[command(subcommand)]
        action: SkillAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// The installable hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HookName {
    /// Block long-running dev server commands (PreToolUse)
    DevCommands,
    /// Require dev mode for code edits (PreToolUse)
    Delegation,
    /// Keep task files in .claude/tasks and well formed (PreToolUse)
    TaskFiles,
    /// Block protected paths and dangerous commands (PreToolUse)
    Protect,
    /// Remind to cite research findings (PostToolUse)
    Research,
    /// Ask for prompt refinement on role commands (UserPromptSubmit)
    Refine,
    /// Inject role skills matching the prompt (UserPromptSubmit)
    Skills,
    /// Print the mandatory rules banner (SessionStart)
    SessionRules,
}

impl HookName {
    /// Event the hook is installed for
    pub fn event(&self) -> HookEvent {
        match self {
            HookName::DevCommands | HookName::Delegation | HookName::TaskFiles | HookName::Protect => {
                HookEvent::PreToolUse
            }
            HookName::Research => HookEvent::PostToolUse,
            HookName::Refine | HookName::Skills => HookEvent::UserPromptSubmit,
            HookName::SessionRules => HookEvent::SessionStart,
        }
    }
}

#[derive(Subcommand)]
pub enum SkillAction {
    /// List a role's indexed skills
    List {
        /// Role to list
        #[arg(value_enum)]
        role: Role,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Score a prompt against a role's skills and show the injected context
    Match {
        /// Role to match against
        #[arg(value_enum)]
        role: Role,

        /// Prompt text
        prompt: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}
