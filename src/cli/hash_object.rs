use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use git_rs::Repository;
use git_rs::object::{Blob, Commit, GitObject, ObjectKind, Tag, Tree};

pub fn run(write: bool, kind: &str, file: PathBuf) -> Result<()> {
    let kind = ObjectKind::from_str(kind).map_err(|e| anyhow::anyhow!(e))?;
    let data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
    let object = match kind {
        ObjectKind::Blob => GitObject::Blob(Blob::parse(&data)),
        ObjectKind::Tree => GitObject::Tree(Tree::parse(&data)?),
        ObjectKind::Commit => GitObject::Commit(Commit::parse(&data)?),
        ObjectKind::Tag => GitObject::Tag(Tag::parse(&data)?),
    };

    let oid = if write {
        // Fixed from the source: this must resolve the enclosing
        // repository rather than joining a bare ".git" path, or -w
        // silently writes nowhere when run from a subdirectory.
        let repo = Repository::find(".").context("finding repository to write into")?;
        object.write(&repo)?
    } else {
        object.hash()
    };
    println!("{oid}");
    Ok(())
}
