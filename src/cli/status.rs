use anyhow::Result;

use git_rs::Repository;
use git_rs::index::Index;
use git_rs::status::{diff_head_index, diff_index_worktree, tree_to_dict};

use super::check_ignore::build_ruleset;

/// Prints plain labeled lines - no ANSI color, no terminal rendering.
/// That presentation layer is explicitly out of core (spec §1).
pub fn run(repo: &Repository) -> Result<()> {
    let index = Index::read(&repo.path(&["index"]))?;
    let head = tree_to_dict(repo, "HEAD")?;
    let head_diff = diff_head_index(&head, &index);

    for name in &head_diff.added {
        println!("added:    {name}");
    }
    for name in &head_diff.modified {
        println!("modified: {name}");
    }
    for name in &head_diff.deleted {
        println!("deleted:  {name}");
    }

    let ignore = build_ruleset(repo)?;
    let worktree_diff = diff_index_worktree(repo, &index, &ignore)?;
    for name in &worktree_diff.modified {
        println!("modified: {name} (worktree)");
    }
    for name in &worktree_diff.deleted {
        println!("deleted:  {name} (worktree)");
    }
    for name in &worktree_diff.untracked {
        println!("untracked: {name}");
    }
    Ok(())
}
