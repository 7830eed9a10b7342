use anyhow::Result;

use git_rs::Repository;
use git_rs::index::Index;

pub fn run(repo: &Repository, verbose: bool) -> Result<()> {
    let index = Index::read(&repo.path(&["index"]))?;
    for entry in &index.entries {
        if verbose {
            println!(
                "{} {} {}\t{}",
                entry.tree_mode(),
                entry.sha,
                entry.stage,
                entry.name
            );
        } else {
            println!("{}", entry.name);
        }
    }
    Ok(())
}
