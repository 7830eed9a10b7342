use anyhow::Result;

use git_rs::Repository;
use git_rs::object::ObjectKind;
use git_rs::resolve;

pub fn run(repo: &Repository, kind: Option<&str>, name: &str) -> Result<()> {
    let expected = kind
        .map(ObjectKind::from_str)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let oid = resolve::find(repo, name, expected, true)?;
    println!("{oid}");
    Ok(())
}
