//! Ordered rule tables
//!
//! Every pattern-driven gate evaluates its input against an ordered list of
//! predicates. Tables are deny-only: the first matching rule is reported, and
//! the absence of a match is an approval.

use regex::{Regex, RegexBuilder};

/// A single match predicate
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches when some occurrence of `pattern` is not followed by
    /// `unless`. `unless` is tried against the text after each occurrence.
    Regex { pattern: Regex, unless: Option<Regex> },
    /// Plain substring containment
    Substring { needle: String, case_sensitive: bool },
}

impl Matcher {
    /// Case-insensitive regex
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regex {
            pattern: case_insensitive(pattern)?,
            unless: None,
        })
    }

    /// Case-insensitive regex with an exclusion standing in for a negative
    /// look-ahead. Anchor `unless` with `^` to test only what immediately
    /// follows the occurrence.
    pub fn regex_unless(pattern: &str, unless: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regex {
            pattern: case_insensitive(pattern)?,
            unless: Some(case_insensitive(unless)?),
        })
    }

    pub fn substring(needle: &str, case_sensitive: bool) -> Self {
        Self::Substring {
            needle: needle.to_string(),
            case_sensitive,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Regex { pattern, unless: None } => pattern.is_match(text),
            Matcher::Regex {
                pattern,
                unless: Some(unless),
            } => pattern.find_iter(text).any(|m| !unless.is_match(&text[m.end()..])),
            Matcher::Substring { needle, case_sensitive: true } => text.contains(needle.as_str()),
            Matcher::Substring { needle, case_sensitive: false } => {
                text.to_lowercase().contains(&needle.to_lowercase())
            }
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A predicate paired with the label reported when it fires
#[derive(Debug, Clone)]
pub struct Rule {
    pub label: String,
    pub matcher: Matcher,
}

impl Rule {
    pub fn new(label: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            label: label.into(),
            matcher,
        }
    }
}

/// An ordered, short-circuiting rule list
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Substring table where each needle is its own label
    pub fn substrings(needles: &[&str], case_sensitive: bool) -> Self {
        Self::new(
            needles
                .iter()
                .map(|n| Rule::new(*n, Matcher::substring(n, case_sensitive)))
                .collect(),
        )
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Append user-supplied regexes, skipping any that fail to compile
    pub fn extend_regexes(&mut self, patterns: &[String]) {
        for pattern in patterns {
            match Matcher::regex(pattern) {
                Ok(matcher) => self.push(Rule::new(pattern.clone(), matcher)),
                Err(e) => log::warn!("Skipping invalid pattern {:?}: {}", pattern, e),
            }
        }
    }

    /// Append user-supplied substrings
    pub fn extend_substrings(&mut self, needles: &[String], case_sensitive: bool) {
        for needle in needles.iter().filter(|n| !n.is_empty()) {
            self.push(Rule::new(needle.clone(), Matcher::substring(needle, case_sensitive)));
        }
    }

    /// First rule matching `text`, in table order
    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matcher.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
