use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use git_rs::Oid;
use git_rs::Repository;
use git_rs::object::{GitObject, ObjectKind};
use git_rs::resolve;

/// Checks out `commit`'s tree into `target`, which must not exist or
/// must be empty - checking out into a non-empty directory is a usage
/// error (spec §7), since this core does no merge of working-tree
/// state.
pub fn run(commit: &str, target: PathBuf) -> Result<()> {
    // Fixed from the source: resolve the enclosing repository properly
    // rather than joining a bare ".git" path.
    let repo = Repository::find(".").context("finding repository")?;

    if target.exists() {
        if !target.is_dir() {
            bail!("checkout target {} is not a directory", target.display());
        }
        if fs::read_dir(&target)?.next().is_some() {
            bail!("checkout target {} is not empty", target.display());
        }
    } else {
        fs::create_dir_all(&target)?;
    }

    let tree_oid = resolve::find(&repo, commit, Some(ObjectKind::Tree), true)
        .with_context(|| format!("resolving {commit}"))?;
    checkout_tree(&repo, tree_oid, &target)
}

fn checkout_tree(repo: &Repository, tree_oid: Oid, dest: &Path) -> Result<()> {
    let GitObject::Tree(tree) = GitObject::read(repo, &tree_oid)? else {
        bail!("{tree_oid} is not a tree");
    };
    for leaf in &tree.leaves {
        let out_path = dest.join(&leaf.name);
        match ObjectKind::from_mode(&leaf.mode) {
            ObjectKind::Tree => {
                fs::create_dir_all(&out_path)?;
                checkout_tree(repo, leaf.oid, &out_path)?;
            }
            ObjectKind::Blob => {
                let GitObject::Blob(blob) = GitObject::read(repo, &leaf.oid)? else {
                    bail!("{} is not a blob", leaf.oid);
                };
                fs::write(&out_path, &blob.data)?;
            }
            other => bail!("cannot checkout object kind {:?} at {}", other, leaf.name),
        }
    }
    Ok(())
}
