use std::path::PathBuf;

use anyhow::{Context, Result};

use git_rs::Repository;

pub fn run(path: PathBuf) -> Result<()> {
    let repo = Repository::create(&path).with_context(|| format!("initializing {}", path.display()))?;
    println!(
        "Initialized empty Git repository in {}",
        repo.gitdir().display()
    );
    Ok(())
}
