//! Diffs HEAD against the index (committed vs staged) and the index
//! against the working tree (staged vs actual), classifying entries as
//! added, modified, deleted, or untracked.

use std::collections::BTreeMap;
use std::fs;

use tracing::info;
use walkdir::WalkDir;

use crate::error::Result;
use crate::ignore::GitIgnore;
use crate::index::Index;
use crate::object::{Blob, GitObject, ObjectKind};
use crate::oid::Oid;
use crate::repo::Repository;
use crate::resolve;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadVsIndex {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexVsWorktree {
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub untracked: Vec<String>,
}

/// Flattens the tree reachable from `ref_name` (e.g. `"HEAD"`) into
/// `{full_path -> blob oid}`. Returns an empty map if the ref does not
/// resolve to anything (unborn branch).
pub fn tree_to_dict(repo: &Repository, ref_name: &str) -> Result<BTreeMap<String, Oid>> {
    let mut out = BTreeMap::new();
    let Ok(tree_oid) = resolve::find(repo, ref_name, Some(ObjectKind::Tree), true) else {
        return Ok(out);
    };
    walk_tree(repo, tree_oid, "", &mut out)?;
    Ok(out)
}

fn walk_tree(
    repo: &Repository,
    oid: Oid,
    prefix: &str,
    out: &mut BTreeMap<String, Oid>,
) -> Result<()> {
    let GitObject::Tree(tree) = GitObject::read(repo, &oid)? else {
        return Ok(());
    };
    for leaf in &tree.leaves {
        let full_path = if prefix.is_empty() {
            leaf.name.clone()
        } else {
            format!("{prefix}/{}", leaf.name)
        };
        if leaf.is_tree() {
            walk_tree(repo, leaf.oid, &full_path, out)?;
        } else {
            out.insert(full_path, leaf.oid);
        }
    }
    Ok(())
}

/// Committed vs staged: entries equal in both are dropped; entries
/// whose OID differs are modified; entries only in the index are
/// added; entries only in HEAD are deleted.
pub fn diff_head_index(head: &BTreeMap<String, Oid>, index: &Index) -> HeadVsIndex {
    let mut head = head.clone();
    let mut result = HeadVsIndex::default();
    for entry in &index.entries {
        match head.remove(&entry.name) {
            Some(head_oid) if head_oid == entry.sha => {}
            Some(_) => result.modified.push(entry.name.clone()),
            None => result.added.push(entry.name.clone()),
        }
    }
    result.deleted = head.into_keys().collect();
    result.added.sort();
    result.modified.sort();
    result.deleted.sort();
    info!(
        added = result.added.len(),
        modified = result.modified.len(),
        deleted = result.deleted.len(),
        "head vs index diff"
    );
    result
}

/// Staged vs actual. For each index entry: absent on disk -> deleted.
/// Present and `(ctime_ns, mtime_ns)` match the stat the index recorded
/// -> assumed unchanged (racily-clean check skipped; re-hash on any
/// timestamp drift). Present but timestamps differ -> recompute the
/// blob SHA from file contents and compare. Worktree files absent from
/// the index and not ignored -> untracked.
pub fn diff_index_worktree(
    repo: &Repository,
    index: &Index,
    ignore: &GitIgnore,
) -> Result<IndexVsWorktree> {
    let mut result = IndexVsWorktree::default();
    let mut tracked: std::collections::HashSet<String> = std::collections::HashSet::new();

    for entry in &index.entries {
        tracked.insert(entry.name.clone());
        let path = repo.worktree().join(&entry.name);
        let Ok(meta) = fs::symlink_metadata(&path) else {
            result.deleted.push(entry.name.clone());
            continue;
        };
        let recorded = (entry.ctime_ns_total(), entry.mtime_ns_total());
        let actual = stat_ns(&meta);
        if recorded == actual {
            continue;
        }
        let data = fs::read(&path).unwrap_or_default();
        let blob_oid = GitObject::Blob(Blob::parse(&data)).hash();
        if blob_oid != entry.sha {
            result.modified.push(entry.name.clone());
        }
    }

    for dirent in WalkDir::new(repo.worktree())
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(std::result::Result::ok)
    {
        if dirent.file_type().is_dir() {
            continue;
        }
        let rel = dirent
            .path()
            .strip_prefix(repo.worktree())
            .unwrap()
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");
        if tracked.contains(&rel) {
            continue;
        }
        if ignore.check(&rel)? {
            continue;
        }
        result.untracked.push(rel);
    }

    result.modified.sort();
    result.deleted.sort();
    result.untracked.sort();
    Ok(result)
}

fn stat_ns(meta: &std::fs::Metadata) -> (i128, i128) {
    use std::os::unix::fs::MetadataExt;
    let ctime = meta.ctime() as i128 * 1_000_000_000 + meta.ctime_nsec() as i128;
    let mtime = meta.mtime() as i128 * 1_000_000_000 + meta.mtime_nsec() as i128;
    (ctime, mtime)
}
