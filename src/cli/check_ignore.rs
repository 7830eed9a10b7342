use std::fs;

use anyhow::Result;

use git_rs::Repository;
use git_rs::config;
use git_rs::ignore::GitIgnore;
use git_rs::index::Index;
use git_rs::object::{Blob, GitObject};

/// Builds the full ignore ruleset: absolute sources from disk (global
/// `git/ignore`, then `.git/info/exclude`), and scoped `.gitignore`
/// rulesets sourced from blobs already staged in the index - not from
/// `.gitignore` files on disk. This mirrors the source's deliberate
/// choice (spec §6): a `.gitignore` only takes effect once it has been
/// `add`ed.
pub fn build_ruleset(repo: &Repository) -> Result<GitIgnore> {
    let mut ignore = GitIgnore::new();

    if let Some(path) = config::global_ignore_path() {
        if let Ok(content) = fs::read_to_string(&path) {
            ignore.add_absolute(&content);
        }
    }
    let exclude_path = repo.path(&["info", "exclude"]);
    if let Ok(content) = fs::read_to_string(&exclude_path) {
        ignore.add_absolute(&content);
    }

    let index = Index::read(&repo.path(&["index"]))?;
    for entry in &index.entries {
        let is_gitignore = entry.name == ".gitignore" || entry.name.ends_with("/.gitignore");
        if !is_gitignore {
            continue;
        }
        let dir = match entry.name.rfind('/') {
            Some(idx) => &entry.name[..idx],
            None => "",
        };
        if let GitObject::Blob(Blob { data }) = GitObject::read(repo, &entry.sha)? {
            ignore.add_scoped(dir, &String::from_utf8_lossy(&data));
        }
    }

    Ok(ignore)
}

pub fn run(repo: &Repository, paths: &[String]) -> Result<()> {
    let ignore = build_ruleset(repo)?;
    for path in paths {
        if ignore.check(path)? {
            println!("{path}");
        }
    }
    Ok(())
}
