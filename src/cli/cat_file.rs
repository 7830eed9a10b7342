use std::io::{self, Write};

use anyhow::{Context, Result, bail};

use git_rs::Repository;
use git_rs::object::{GitObject, ObjectKind};
use git_rs::resolve;

pub fn run(repo: &Repository, kind: &str, object: &str) -> Result<()> {
    let expected = ObjectKind::from_str(kind).map_err(|e| anyhow::anyhow!(e))?;
    let oid = resolve::find(repo, object, Some(expected), true).context("resolving object")?;
    let obj = GitObject::read(repo, &oid)?;
    if obj.kind() != expected {
        bail!("object {} is not a {}", oid, kind);
    }
    let bytes = obj.serialize();
    io::stdout().write_all(&bytes)?;
    Ok(())
}
