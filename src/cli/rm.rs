use std::fs;
use std::path::Path;

use anyhow::{Result, bail};

use git_rs::Repository;
use git_rs::index::Index;

/// Removes each path from the index and from the worktree. A path
/// outside the worktree is a usage error (spec §7).
pub fn run(repo: &Repository, paths: &[String]) -> Result<()> {
    let index_path = repo.path(&["index"]);
    let mut index = Index::read(&index_path)?;

    for path in paths {
        let rel = relative_to_worktree(repo, path)?;
        if !index.remove(&rel) {
            bail!("pathspec '{path}' did not match any tracked files");
        }
        let abs = repo.worktree().join(&rel);
        if abs.exists() {
            fs::remove_file(&abs)?;
        }
    }

    index.write(&index_path)?;
    Ok(())
}

fn relative_to_worktree(repo: &Repository, path: &str) -> Result<String> {
    let candidate = Path::new(path);
    let abs = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        std::env::current_dir()?.join(candidate)
    };
    let abs = abs
        .canonicalize()
        .unwrap_or(abs);
    let rel = abs.strip_prefix(repo.worktree()).map_err(|_| {
        anyhow::anyhow!("path '{path}' is outside the worktree {}", repo.worktree().display())
    })?;
    Ok(rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"))
}
