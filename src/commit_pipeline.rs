//! Composes tree-from-index + parent (HEAD) + author/committer +
//! message + timestamp-with-timezone into a commit object, then
//! advances the active branch ref (§4.11).

use chrono::Local;
use tracing::info;

use crate::config;
use crate::error::Result;
use crate::index::Index;
use crate::object::{Commit, GitObject};
use crate::oid::Oid;
use crate::refs;
use crate::repo::Repository;
use crate::tree_builder::build_tree_from_index;

/// Builds `"<unix_seconds> <±HHMM>"`, the timestamp-with-timezone
/// suffix of an author/committer line.
pub fn timestamp_and_offset() -> (i64, String) {
    let now = Local::now();
    let offset_seconds = now.offset().local_minus_utc();
    let hours = offset_seconds / 3600;
    let minutes = offset_seconds.abs() % 3600 / 60;
    (now.timestamp(), format!("{hours:+03}{minutes:02}"))
}

pub fn author_line() -> String {
    let identity = config::user_identity();
    let (ts, tz) = timestamp_and_offset();
    format!("{identity} {ts} {tz}")
}

/// Reads the index, builds its tree, resolves HEAD's current commit (if
/// any; none on an unborn branch), and writes a new commit object with
/// that tree, that commit as sole parent, the given message, and the
/// current identity/time. Then advances whichever ref HEAD points at -
/// a branch ref if HEAD is symbolic, or HEAD itself if detached.
pub fn commit(repo: &Repository, message: &str) -> Result<Oid> {
    let index_path = repo.path(&["index"]);
    let index = Index::read(&index_path)?;
    let tree_oid = build_tree_from_index(repo, &index)?;

    let parent = refs::resolve(repo, "HEAD")?;
    let parents: Vec<Oid> = parent.into_iter().collect();

    let line = author_line();
    let commit = Commit::build(tree_oid, &parents, &line, message);
    let commit_oid = GitObject::Commit(commit).write(repo)?;

    match refs::head_branch(repo)? {
        Some(branch) => refs::create(repo, &branch, &commit_oid)?,
        None => refs::create(repo, "HEAD", &commit_oid)?,
    }

    info!(oid = %commit_oid, tree = %tree_oid, "created commit");
    Ok(commit_oid)
}
