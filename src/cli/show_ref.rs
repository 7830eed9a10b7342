use anyhow::Result;

use git_rs::Repository;
use git_rs::refs::{self, RefTree};

pub fn run(repo: &Repository) -> Result<()> {
    let tree = refs::list(repo)?;
    print_node("refs", &RefTree::Node(tree));
    Ok(())
}

fn print_node(prefix: &str, node: &RefTree) {
    match node {
        RefTree::Leaf(oid) => println!("{oid} {prefix}"),
        RefTree::Node(children) => {
            for (name, child) in children {
                print_node(&format!("{prefix}/{name}"), child);
            }
        }
    }
}
