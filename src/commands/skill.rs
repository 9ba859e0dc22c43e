//! Skill index inspection commands

use colored::*;
use eyre::{Context, Result};
use serde::Serialize;

use crate::cli::{OutputFormat, SkillAction};
use crate::config::Config;
use crate::project;
use crate::skill::index::{MAX_SKILLS, SkillIndex, SkillMatch, render_context};
use crate::skill::{Role, SkillRecord};

/// Run a skill subcommand
pub fn run(action: SkillAction, config: &Config) -> Result<()> {
    match action {
        SkillAction::List { role, format } => list_skills(role, OutputFormat::resolve(format), config),
        SkillAction::Match { role, prompt, format } => {
            match_prompt(role, &prompt, OutputFormat::resolve(format), config)
        }
    }
}

/// Serializable role listing for JSON/YAML output
#[derive(Serialize)]
struct RoleListing<'a> {
    role: &'static str,
    name: String,
    skills: &'a [SkillRecord],
}

/// Serializable match report for JSON/YAML output
#[derive(Serialize)]
struct MatchReport<'a> {
    role: &'static str,
    prompt: &'a str,
    matches: &'a [SkillMatch<'a>],
    context: Option<String>,
}

fn list_skills(role: Role, format: OutputFormat, config: &Config) -> Result<()> {
    let plugin_root = project::plugin_root(config);
    let index = SkillIndex::load(&plugin_root).context("Failed to load skill index")?;
    let role_skills = index.role(role).cloned().unwrap_or_default();

    match format {
        OutputFormat::Text => {
            if role_skills.skills.is_empty() {
                println!("No skills indexed for role '{}'.", role);
                println!();
                println!("Index: {}", crate::skill::skills_dir(&plugin_root).display());
                return Ok(());
            }

            println!("{} ({})", role_skills.display_name(role).bold(), role.to_string().cyan());
            for skill in &role_skills.skills {
                println!("  {} - {}", skill.name, skill.path.dimmed());
                if !skill.keywords.is_empty() {
                    println!("    keywords: {}", skill.keywords.join(", "));
                }
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let listing = RoleListing {
                role: role.id(),
                name: role_skills.display_name(role),
                skills: &role_skills.skills,
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("{}", serde_yaml::to_string(&listing)?);
            }
        }
    }

    Ok(())
}

fn match_prompt(role: Role, prompt: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let plugin_root = project::plugin_root(config);
    let index = SkillIndex::load(&plugin_root).context("Failed to load skill index")?;
    let role_skills = index.role(role).cloned().unwrap_or_default();

    let mut matches = role_skills.match_prompt(prompt);
    matches.truncate(MAX_SKILLS);
    let context = render_context(&plugin_root, &role_skills.display_name(role), &matches);

    if format != OutputFormat::Text {
        let report = MatchReport {
            role: role.id(),
            prompt,
            matches: &matches,
            context,
        };
        if format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", serde_yaml::to_string(&report)?);
        }
        return Ok(());
    }

    if role_skills.skills.is_empty() {
        println!("{} No skills indexed for role '{}'", "⚠".yellow(), role);
        return Ok(());
    }

    if matches.is_empty() {
        println!("{} No skills matched", "○".dimmed());
        return Ok(());
    }

    println!("{}", "Matches:".bold());
    for m in &matches {
        println!(
            "  {} {} ({})",
            m.score.to_string().green(),
            m.skill.name,
            m.matched_keywords.join(", ").dimmed()
        );
    }
    println!();

    match context {
        Some(context) => println!("{}", context),
        None => println!("{} Matched skills have no readable content", "⚠".yellow()),
    }

    Ok(())
}
