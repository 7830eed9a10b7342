use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{GitError, Result};

/// The `.git/config` file: section `core`, keys
/// `repositoryformatversion`, `filemode`, `bare`.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    repositoryformatversion: i64,
    filemode: bool,
    bare: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        RepoConfig {
            repositoryformatversion: 0,
            filemode: false,
            bare: false,
        }
    }
}

impl RepoConfig {
    pub fn repositoryformatversion(&self) -> i64 {
        self.repositoryformatversion
    }

    pub fn filemode(&self) -> bool {
        self.filemode
    }

    pub fn bare(&self) -> bool {
        self.bare
    }

    pub fn read(path: &Path) -> Result<RepoConfig> {
        if !path.exists() {
            return Err(GitError::UsageError(format!(
                "configuration file missing: {}",
                path.display()
            )));
        }
        let ini = Ini::load_from_file(path)
            .map_err(|e| GitError::UsageError(format!("invalid config {}: {e}", path.display())))?;
        let core = ini.section(Some("core"));
        let repositoryformatversion = core
            .and_then(|s| s.get("repositoryformatversion"))
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| {
                GitError::UsageError("core.repositoryformatversion missing or not numeric".into())
            })?;
        let filemode = core
            .and_then(|s| s.get("filemode"))
            .map(|v| v == "true")
            .unwrap_or(false);
        let bare = core
            .and_then(|s| s.get("bare"))
            .map(|v| v == "true")
            .unwrap_or(false);
        Ok(RepoConfig {
            repositoryformatversion,
            filemode,
            bare,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut ini = Ini::new();
        ini.with_section(Some("core"))
            .set(
                "repositoryformatversion",
                self.repositoryformatversion.to_string(),
            )
            .set("filemode", self.filemode.to_string())
            .set("bare", self.bare.to_string());
        ini.write_to_file(path)
            .map_err(|e| GitError::Io(std::io::Error::other(e)))?;
        Ok(())
    }
}

/// Paths to the user-level and system-level config/ignore sources, in
/// ascending precedence order. `$XDG_CONFIG_HOME` defaults to
/// `~/.config` when unset, matching Git's own resolution.
fn xdg_config_home() -> Option<PathBuf> {
    if let Ok(v) = std::env::var("XDG_CONFIG_HOME") {
        if !v.is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    dirs::home_dir().map(|h| h.join(".config"))
}

pub fn user_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(xdg) = xdg_config_home() {
        paths.push(xdg.join("git/config"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".gitconfig"));
    }
    paths
}

pub fn global_ignore_path() -> Option<PathBuf> {
    xdg_config_home().map(|p| p.join("git/ignore"))
}

/// Resolves the user identity as `Name <email>` by merging
/// `$XDG_CONFIG_HOME/git/config` and `~/.gitconfig`, later file wins on
/// key conflicts. Falls back to a generic placeholder identity if
/// neither file defines `user.name`/`user.email`, so that `commit`
/// never fails outright for lack of configuration.
pub fn user_identity() -> String {
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;
    for path in user_config_paths() {
        let Ok(ini) = Ini::load_from_file(&path) else {
            continue;
        };
        if let Some(section) = ini.section(Some("user")) {
            if let Some(v) = section.get("name") {
                name = Some(v.to_string());
            }
            if let Some(v) = section.get("email") {
                email = Some(v.to_string());
            }
        }
    }
    let name = name.unwrap_or_else(|| "Unknown".to_string());
    let email = email.unwrap_or_else(|| "unknown@localhost".to_string());
    format!("{name} <{email}>")
}
