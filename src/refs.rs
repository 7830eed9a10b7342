//! The reference store: text files under `refs/` (and the file `HEAD`)
//! containing either a 40-hex SHA or `ref: <path>` indirection.

use std::collections::BTreeMap;
use std::fs;

use tracing::debug;

use crate::error::{GitError, Result};
use crate::oid::Oid;
use crate::repo::Repository;

const INDIRECT_PREFIX: &str = "ref: ";

/// A resolved or nested reference listing, as returned by [`list`].
#[derive(Debug, Clone)]
pub enum RefTree {
    Leaf(Oid),
    Node(BTreeMap<String, RefTree>),
}

/// Reads `ref_path` (relative to the gitdir) and follows `ref: `
/// indirection recursively until a direct 40-hex OID is found, or the
/// file is missing (`Ok(None)`). A cycle is reported as a malformed
/// reference rather than looping forever.
pub fn resolve(repo: &Repository, ref_path: &str) -> Result<Option<Oid>> {
    resolve_inner(repo, ref_path, 0)
}

fn resolve_inner(repo: &Repository, ref_path: &str, depth: u32) -> Result<Option<Oid>> {
    if depth > 32 {
        return Err(GitError::UsageError(format!(
            "reference cycle detected resolving {ref_path}"
        )));
    }
    let parts: Vec<&str> = ref_path.split('/').collect();
    let path = repo.path(&parts);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(GitError::Io(e)),
    };
    let content = content.trim_end_matches('\n');
    if let Some(target) = content.strip_prefix(INDIRECT_PREFIX) {
        debug!(from = ref_path, to = target, "following indirect ref");
        resolve_inner(repo, target, depth + 1)
    } else {
        Ok(Some(Oid::from_hex(content)?))
    }
}

/// Writes a direct reference: `oid\n` to `refs/<ref_name>` (or any
/// gitdir-relative path, e.g. `HEAD`), creating parent directories as
/// needed.
pub fn create(repo: &Repository, ref_name: &str, oid: &Oid) -> Result<()> {
    let parts: Vec<&str> = ref_name.split('/').collect();
    let path = repo.file(&parts)?;
    fs::write(path, format!("{}\n", oid.to_hex())).map_err(GitError::Io)?;
    Ok(())
}

/// Writes an indirect reference: `ref: <target>\n`.
pub fn create_symbolic(repo: &Repository, ref_name: &str, target: &str) -> Result<()> {
    let parts: Vec<&str> = ref_name.split('/').collect();
    let path = repo.file(&parts)?;
    fs::write(path, format!("ref: {target}\n")).map_err(GitError::Io)?;
    Ok(())
}

/// Recursively walks `refs/`, sorted lexicographically at each level.
pub fn list(repo: &Repository) -> Result<BTreeMap<String, RefTree>> {
    list_dir(repo, "refs")
}

fn list_dir(repo: &Repository, rel: &str) -> Result<BTreeMap<String, RefTree>> {
    let parts: Vec<&str> = rel.split('/').collect();
    let path = repo.path(&parts);
    let mut out = BTreeMap::new();
    if !path.is_dir() {
        return Ok(out);
    }
    let mut entries: Vec<_> = fs::read_dir(&path)
        .map_err(GitError::Io)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(GitError::Io)?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let child_rel = format!("{rel}/{name}");
        if entry.path().is_dir() {
            out.insert(name, RefTree::Node(list_dir(repo, &child_rel)?));
        } else if let Some(oid) = resolve(repo, &child_rel)? {
            out.insert(name, RefTree::Leaf(oid));
        }
    }
    Ok(out)
}

/// Whether `HEAD` currently points at a branch (`ref: refs/heads/...`),
/// and if so, which branch ref name.
pub fn head_branch(repo: &Repository) -> Result<Option<String>> {
    let content = match fs::read_to_string(repo.path(&["HEAD"])) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(GitError::Io(e)),
    };
    let content = content.trim_end_matches('\n');
    Ok(content
        .strip_prefix(INDIRECT_PREFIX)
        .filter(|t| t.starts_with("refs/heads/"))
        .map(str::to_string))
}
