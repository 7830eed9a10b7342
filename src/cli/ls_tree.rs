use anyhow::{Context, Result, bail};

use git_rs::Repository;
use git_rs::object::{GitObject, ObjectKind};
use git_rs::resolve;

pub fn run(repo: &Repository, recursive: bool, tree: &str) -> Result<()> {
    let oid = resolve::find(repo, tree, Some(ObjectKind::Tree), true).context("resolving tree")?;
    print_tree(repo, oid, "", recursive)
}

fn print_tree(repo: &Repository, oid: git_rs::Oid, prefix: &str, recursive: bool) -> Result<()> {
    let GitObject::Tree(tree) = GitObject::read(repo, &oid)? else {
        bail!("{} is not a tree object", oid);
    };
    let mut leaves = tree.leaves.clone();
    leaves.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    for leaf in &leaves {
        let full_path = if prefix.is_empty() {
            leaf.name.clone()
        } else {
            format!("{prefix}/{}", leaf.name)
        };
        let entry_kind = ObjectKind::from_mode(&leaf.mode);
        if recursive && entry_kind == ObjectKind::Tree {
            print_tree(repo, leaf.oid, &full_path, recursive)?;
        } else {
            println!(
                "{:0>6} {} {}\t{}",
                leaf.mode,
                entry_kind.as_str(),
                leaf.oid,
                full_path
            );
        }
    }
    Ok(())
}
