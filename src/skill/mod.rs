//! Role-scoped skills
//!
//! Skills are markdown documents listed per role in
//! `<plugin_root>/skills/skill-index.json`. On each prompt the invoked
//! role's skills are scored by keyword hits and the best ones are injected
//! into the agent's context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod index;

/// Skills directory, relative to the plugin root
pub const SKILLS_DIR: &str = "skills";

/// Index file name inside the skills directory
pub const INDEX_FILE: &str = "skill-index.json";

/// Roles that can invoke skill retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dev,
    Ba,
    Design,
    Pm,
    Tester,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Dev, Role::Ba, Role::Design, Role::Pm, Role::Tester];

    /// Parse a role argument (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let id = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|role| role.id() == id)
    }

    /// Key used in the index
    pub fn id(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Ba => "ba",
            Self::Design => "design",
            Self::Pm => "pm",
            Self::Tester => "tester",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One skill as listed in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    /// Content file, relative to the skills directory
    pub path: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SkillRecord {
    /// Number of keywords found in the (already lowercased) prompt
    pub fn score(&self, prompt_lower: &str) -> usize {
        self.matched_keywords(prompt_lower).len()
    }

    pub fn matched_keywords(&self, prompt_lower: &str) -> Vec<&str> {
        self.keywords
            .iter()
            .filter(|kw| !kw.is_empty() && prompt_lower.contains(&kw.to_lowercase()))
            .map(String::as_str)
            .collect()
    }
}

/// Skills directory under a plugin root
pub fn skills_dir(plugin_root: &Path) -> PathBuf {
    plugin_root.join(SKILLS_DIR)
}
