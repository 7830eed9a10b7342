use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::RepoConfig;
use crate::error::{GitError, Result};

/// A located repository: a worktree root paired with its `.git` directory.
///
/// Constructed either by [`Repository::find`] (walks parents looking for
/// `.git`) or [`Repository::create`] (lays out a fresh `.git`). Immutable
/// once constructed — every operation takes `&self`.
#[derive(Debug, Clone)]
pub struct Repository {
    worktree: PathBuf,
    gitdir: PathBuf,
    config: RepoConfig,
}

impl Repository {
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn gitdir(&self) -> &Path {
        &self.gitdir
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Joins `parts` under the gitdir. Does not create anything.
    pub fn path(&self, parts: &[&str]) -> PathBuf {
        let mut p = self.gitdir.clone();
        for part in parts {
            p.push(part);
        }
        p
    }

    /// Same as [`Repository::path`], but ensures the parent directory of
    /// the joined path exists first.
    pub fn file(&self, parts: &[&str]) -> Result<PathBuf> {
        if let Some((_, dirs)) = parts.split_last() {
            self.dir(dirs, true)?;
        }
        Ok(self.path(parts))
    }

    /// Same as [`Repository::path`], but treats the joined path as a
    /// directory: returns `None` if absent and `mkdir` is false, creates
    /// it (recursively) if `mkdir` is true.
    pub fn dir(&self, parts: &[&str], mkdir: bool) -> Result<Option<PathBuf>> {
        let path = self.path(parts);
        if path.exists() {
            if path.is_dir() {
                return Ok(Some(path));
            }
            return Err(GitError::UsageError(format!(
                "not a directory: {}",
                path.display()
            )));
        }
        if mkdir {
            fs::create_dir_all(&path)?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }

    /// Walks `path` and its ancestors looking for a directory containing
    /// `.git`. Fails with [`GitError::NoRepository`] at the filesystem
    /// root.
    pub fn find(path: impl AsRef<Path>) -> Result<Repository> {
        let start = fs::canonicalize(path.as_ref())?;
        let mut cur = start.as_path();
        loop {
            let candidate = cur.join(".git");
            if candidate.is_dir() {
                debug!(gitdir = %candidate.display(), "located repository");
                return Self::open(cur.to_path_buf(), candidate);
            }
            match cur.parent() {
                Some(parent) => cur = parent,
                None => return Err(GitError::NoRepository { at: start }),
            }
        }
    }

    fn open(worktree: PathBuf, gitdir: PathBuf) -> Result<Repository> {
        let config_path = gitdir.join("config");
        let config = RepoConfig::read(&config_path)?;
        let version = config.repositoryformatversion();
        if version != 0 {
            return Err(GitError::UnsupportedFormat { found: version });
        }
        Ok(Repository {
            worktree,
            gitdir,
            config,
        })
    }

    /// Lays out a new repository at `path`. `path` must either not exist
    /// yet, or exist as an empty directory (or a directory with no `.git`
    /// inside it).
    pub fn create(path: impl AsRef<Path>) -> Result<Repository> {
        let worktree = path.as_ref().to_path_buf();
        if worktree.exists() {
            if !worktree.is_dir() {
                return Err(GitError::UsageError(format!(
                    "{} is not a directory",
                    worktree.display()
                )));
            }
            let gitdir = worktree.join(".git");
            if gitdir.exists() {
                return Err(GitError::UsageError(format!(
                    "{} is already a git repository",
                    worktree.display()
                )));
            }
        } else {
            fs::create_dir_all(&worktree)?;
        }
        let gitdir = worktree.join(".git");
        trace!(gitdir = %gitdir.display(), "initializing repository");

        for parts in [
            vec!["branches"],
            vec!["objects"],
            vec!["refs", "tags"],
            vec!["refs", "heads"],
        ] {
            let dirs: Vec<&str> = parts;
            fs::create_dir_all(
                dirs.iter()
                    .fold(gitdir.clone(), |mut acc, p| {
                        acc.push(p);
                        acc
                    }),
            )?;
        }

        fs::write(gitdir.join("description"), DESCRIPTION_PLACEHOLDER)?;
        fs::write(gitdir.join("HEAD"), "ref: refs/heads/master\n")?;

        let config = RepoConfig::default();
        config.write(&gitdir.join("config"))?;

        Self::open(worktree, gitdir)
    }
}

const DESCRIPTION_PLACEHOLDER: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";
