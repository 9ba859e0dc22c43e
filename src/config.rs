use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::project::PLUGIN_ROOT_ENV;

/// Config file name searched for in each location of the fallback chain
pub const CONFIG_FILE_NAME: &str = "coze-hooks.yaml";

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "COZE_HOOKS_CONFIG";

/// Main coze-hooks configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub paths: PathsConfig,
    pub hooks: HooksConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Plugin installation root holding `skills/` and `rules/`.
    /// `CLAUDE_PLUGIN_ROOT` takes precedence when set.
    pub plugin_root: Option<PathBuf>,
}

/// Per-hook switches; a disabled hook never handles any event
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HooksConfig {
    pub dev_commands: bool,
    pub delegation: bool,
    pub task_files: bool,
    pub protect: bool,
    pub research: bool,
    pub refine: bool,
    pub skills: bool,
    pub session_rules: bool,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            dev_commands: true,
            delegation: true,
            task_files: true,
            protect: true,
            research: true,
            refine: true,
            skills: true,
            session_rules: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    pub dev_commands: DevCommandRules,
    pub protect: ProtectRules,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DevCommandRules {
    /// Additional case-insensitive regexes that block a Bash command
    pub extra_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProtectRules {
    /// Additional case-insensitive path fragments
    pub extra_paths: Vec<String>,
    /// Additional case-sensitive command fragments
    pub extra_commands: Vec<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::candidate_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Locations searched when no explicit config is given, in priority order
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(env_path) = std::env::var(CONFIG_ENV)
            && !env_path.is_empty()
        {
            paths.push(PathBuf::from(env_path));
        }

        if let Ok(plugin_root) = std::env::var(PLUGIN_ROOT_ENV)
            && !plugin_root.is_empty()
        {
            paths.push(PathBuf::from(plugin_root).join(CONFIG_FILE_NAME));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("coze-hooks").join(CONFIG_FILE_NAME));
        }

        // For development
        paths.push(PathBuf::from(CONFIG_FILE_NAME));

        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
