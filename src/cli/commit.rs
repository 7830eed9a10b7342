use anyhow::Result;

use git_rs::Repository;
use git_rs::commit_pipeline;

pub fn run(repo: &Repository, message: &str) -> Result<()> {
    let oid = commit_pipeline::commit(repo, message)?;
    println!("{oid}");
    Ok(())
}
