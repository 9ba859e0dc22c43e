//! Project and plugin root resolution
//!
//! All filesystem state these hooks care about lives under a project-local
//! `.claude/` directory. The project root is the first ancestor of the working
//! directory that contains `.claude/` or `.git/`.

use std::path::{Component, Path, PathBuf};

use crate::config::Config;

/// Project-local configuration directory
pub const CLAUDE_DIR: &str = ".claude";

/// Marker whose existence unlocks code editing
pub const DEV_MODE_FILE: &str = ".claude/.dev-mode";

/// Canonical task directory, relative to the project root
pub const TASKS_DIR: &str = ".claude/tasks";

/// Directories that identify a project root, in priority order
const ROOT_MARKERS: &[&str] = &[CLAUDE_DIR, ".git"];

/// Environment variable the host sets to the plugin installation directory
pub const PLUGIN_ROOT_ENV: &str = "CLAUDE_PLUGIN_ROOT";

/// Walk upward from `start` to the first directory holding a root marker.
///
/// The filesystem root itself is never treated as a project. Falls back to
/// `start` when nothing is found.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .find(|dir| ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_dir()))
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf())
}

/// Current working directory, or `.` if it cannot be determined
pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Whether the dev-mode marker exists.
///
/// Checked at the project root, at `cwd`, and as a bare relative path. Read
/// fresh on every call since another agent may create the marker at any time.
pub fn editing_unlocked(project_root: &Path, cwd: &Path) -> bool {
    let candidates = [
        project_root.join(DEV_MODE_FILE),
        cwd.join(DEV_MODE_FILE),
        PathBuf::from(DEV_MODE_FILE),
    ];
    candidates.iter().any(|path| path.exists())
}

/// Make `path` absolute against `cwd` and resolve `.`/`..` lexically
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { cwd.join(path) };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Plugin installation root.
///
/// `CLAUDE_PLUGIN_ROOT` wins, then `paths.plugin_root` from config, then the
/// parent of the directory holding this executable.
pub fn plugin_root(config: &Config) -> PathBuf {
    if let Ok(root) = std::env::var(PLUGIN_ROOT_ENV)
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }

    if let Some(ref root) = config.paths.plugin_root {
        return Config::expand_path(root);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
