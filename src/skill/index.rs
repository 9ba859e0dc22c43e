//! Skill index loading, matching and context rendering

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{INDEX_FILE, Role, SkillRecord, skills_dir};

/// Maximum number of skills injected per prompt
pub const MAX_SKILLS: usize = 3;

/// Skills available to one role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleSkills {
    /// Display name, e.g. "Developer"
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
}

/// The complete role → skills index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillIndex {
    #[serde(default)]
    pub roles: IndexMap<String, RoleSkills>,
}

/// A skill that matched a prompt
#[derive(Debug, Clone, Serialize)]
pub struct SkillMatch<'a> {
    pub skill: &'a SkillRecord,
    pub matched_keywords: Vec<&'a str>,
    pub score: usize,
}

impl SkillIndex {
    /// Load `<plugin_root>/skills/skill-index.json`. A missing index is an
    /// empty index.
    pub fn load(plugin_root: &Path) -> Result<Self> {
        let path = skills_dir(plugin_root).join(INDEX_FILE);
        if !path.exists() {
            log::debug!("No skill index at {}", path.display());
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read skill index {}", path.display()))?;
        let index: Self =
            serde_json::from_str(&content).with_context(|| format!("Failed to parse skill index {}", path.display()))?;

        log::debug!("Loaded skill index with {} roles", index.roles.len());
        Ok(index)
    }

    pub fn role(&self, role: Role) -> Option<&RoleSkills> {
        self.roles.get(role.id())
    }
}

impl RoleSkills {
    /// Display name, defaulting to the uppercase role id
    pub fn display_name(&self, role: Role) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| role.id().to_uppercase())
    }

    /// Skills with at least one keyword hit, best first. Ties keep index
    /// order.
    pub fn match_prompt(&self, prompt: &str) -> Vec<SkillMatch<'_>> {
        let prompt_lower = prompt.to_lowercase();
        let mut matches: Vec<SkillMatch<'_>> = self
            .skills
            .iter()
            .filter_map(|skill| {
                let matched_keywords = skill.matched_keywords(&prompt_lower);
                let score = matched_keywords.len();
                (score > 0).then_some(SkillMatch {
                    skill,
                    matched_keywords,
                    score,
                })
            })
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}

/// Read a skill's content file. Missing or unreadable files yield `None`.
pub fn read_skill_content(plugin_root: &Path, skill: &SkillRecord) -> Option<String> {
    let path = skills_dir(plugin_root).join(&skill.path);
    if !path.is_file() {
        log::warn!("Skill '{}' content missing: {}", skill.name, path.display());
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("Failed to read skill '{}' at {}: {}", skill.name, path.display(), e);
            None
        }
    }
}

/// Build the injected context block for the top matches.
///
/// Returns `None` when nothing matched or none of the matched skills had
/// readable content.
pub fn render_context(plugin_root: &Path, role_name: &str, matches: &[SkillMatch<'_>]) -> Option<String> {
    let label = role_name.to_uppercase();
    let sections: Vec<String> = matches
        .iter()
        .take(MAX_SKILLS)
        .filter_map(|m| {
            read_skill_content(plugin_root, m.skill)
                .filter(|content| !content.is_empty())
                .map(|content| format!("=== {} ===\n{}\n", m.skill.name.to_uppercase(), content))
        })
        .collect();

    if sections.is_empty() {
        return None;
    }

    let mut lines = vec![
        format!("[COZE {} SKILL CONTEXT]", label),
        format!("You are acting as a {}. Follow these guidelines:", role_name),
        String::new(),
    ];
    lines.extend(sections);
    lines.push(format!("[END {} SKILL CONTEXT]", label));

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INDEX: &str = r#"{
        "roles": {
            "dev": {
                "name": "Developer",
                "skills": [
                    {"name": "A", "path": "dev/a.md", "keywords": ["foo", "bar"]},
                    {"name": "B", "path": "dev/b.md", "keywords": ["bar"]},
                    {"name": "C", "path": "dev/c.md", "keywords": ["baz"]}
                ]
            },
            "tester": {
                "skills": [
                    {"name": "E2E", "path": "tester/e2e.md", "keywords": ["playwright"]}
                ]
            }
        }
    }"#;

    fn plugin_root() -> TempDir {
        let temp = TempDir::new().unwrap();
        let skills = temp.path().join("skills");
        fs::create_dir_all(skills.join("dev")).unwrap();
        fs::write(skills.join(INDEX_FILE), INDEX).unwrap();
        fs::write(skills.join("dev/a.md"), "Content of A").unwrap();
        fs::write(skills.join("dev/b.md"), "Content of B").unwrap();
        temp
    }

    #[test]
    fn test_load_missing_index_is_empty() {
        let temp = TempDir::new().unwrap();
        let index = SkillIndex::load(temp.path()).unwrap();
        assert!(index.roles.is_empty());
    }

    #[test]
    fn test_load_invalid_index_errors() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("skills")).unwrap();
        fs::write(temp.path().join("skills").join(INDEX_FILE), "{broken").unwrap();
        assert!(SkillIndex::load(temp.path()).is_err());
    }

    #[test]
    fn test_load_preserves_role_order() {
        let temp = plugin_root();
        let index = SkillIndex::load(temp.path()).unwrap();
        let roles: Vec<&str> = index.roles.keys().map(String::as_str).collect();
        assert_eq!(roles, vec!["dev", "tester"]);
    }

    #[test]
    fn test_match_ranks_by_score() {
        let temp = plugin_root();
        let index = SkillIndex::load(temp.path()).unwrap();
        let dev = index.role(Role::Dev).unwrap();
        let matches = dev.match_prompt("please foo and bar this");

        let names: Vec<&str> = matches.iter().map(|m| m.skill.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(matches[0].score, 2);
        assert_eq!(matches[1].score, 1);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let role = RoleSkills {
            name: None,
            skills: vec![
                SkillRecord {
                    name: "first".to_string(),
                    path: "1.md".to_string(),
                    keywords: vec!["x".to_string()],
                },
                SkillRecord {
                    name: "second".to_string(),
                    path: "2.md".to_string(),
                    keywords: vec!["x".to_string()],
                },
            ],
        };
        let matches = role.match_prompt("x");
        assert_eq!(matches[0].skill.name, "first");
        assert_eq!(matches[1].skill.name, "second");
    }

    #[test]
    fn test_render_orders_content() {
        let temp = plugin_root();
        let index = SkillIndex::load(temp.path()).unwrap();
        let dev = index.role(Role::Dev).unwrap();
        let matches = dev.match_prompt("please foo and bar this");
        let context = render_context(temp.path(), &dev.display_name(Role::Dev), &matches).unwrap();

        assert!(context.starts_with("[COZE DEVELOPER SKILL CONTEXT]\nYou are acting as a Developer."));
        assert!(context.ends_with("[END DEVELOPER SKILL CONTEXT]"));
        let a = context.find("Content of A").unwrap();
        let b = context.find("Content of B").unwrap();
        assert!(a < b);
        assert!(context.contains("=== A ==="));
    }

    #[test]
    fn test_render_skips_missing_content() {
        let temp = plugin_root();
        let index = SkillIndex::load(temp.path()).unwrap();
        let tester = index.role(Role::Tester).unwrap();
        let matches = tester.match_prompt("write a playwright test");
        assert_eq!(matches.len(), 1);
        assert!(render_context(temp.path(), &tester.display_name(Role::Tester), &matches).is_none());
    }

    #[test]
    fn test_display_name_defaults_to_role_id() {
        let role = RoleSkills::default();
        assert_eq!(role.display_name(Role::Pm), "PM");
    }

    #[test]
    fn test_render_caps_at_three() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("skills")).unwrap();
        let skills: Vec<SkillRecord> = (0..5)
            .map(|i| {
                let path = format!("s{}.md", i);
                fs::write(temp.path().join("skills").join(&path), format!("body {}", i)).unwrap();
                SkillRecord {
                    name: format!("s{}", i),
                    path,
                    keywords: vec!["go".to_string()],
                }
            })
            .collect();
        let role = RoleSkills { name: None, skills };
        let matches = role.match_prompt("go");
        let context = render_context(temp.path(), "DEV", &matches).unwrap();
        assert!(context.contains("body 2"));
        assert!(!context.contains("body 3"));
    }
}
