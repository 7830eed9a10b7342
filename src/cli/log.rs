use std::collections::VecDeque;

use anyhow::{Context, Result};

use git_rs::Oid;
use git_rs::Repository;
use git_rs::object::{GitObject, ObjectKind};
use git_rs::resolve;

/// Prints a flat commit list reachable from `start` (default `HEAD`),
/// each commit visited once via breadth-first traversal of `parent`
/// edges. No graph rendering - that's the out-of-core `log` graph
/// format the CLI shell owns.
pub fn run(repo: &Repository, start: Option<&str>) -> Result<()> {
    let start_name = start.unwrap_or("HEAD");
    let start_oid = resolve::find(repo, start_name, Some(ObjectKind::Commit), true)
        .with_context(|| format!("resolving {start_name}"))?;

    let mut seen = std::collections::HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(start_oid);
    seen.insert(start_oid);

    while let Some(oid) = queue.pop_front() {
        let GitObject::Commit(commit) = GitObject::read(repo, &oid)? else {
            continue;
        };
        print_entry(&oid, &commit);
        for parent in commit.parents() {
            if seen.insert(parent) {
                queue.push_back(parent);
            }
        }
    }
    Ok(())
}

fn print_entry(oid: &Oid, commit: &git_rs::object::Commit) {
    println!("commit {oid}");
    if let Some(author) = commit.author() {
        println!("Author: {author}");
    }
    let summary = commit.message().lines().next().unwrap_or("");
    println!();
    println!("    {summary}");
    println!();
}
