use anyhow::{Context, Result};

use git_rs::Repository;
use git_rs::commit_pipeline::author_line;
use git_rs::object::{GitObject, Tag};
use git_rs::refs;
use git_rs::resolve;

/// Lists tags when `name` is `None`. Otherwise creates one: a plain ref
/// under `refs/tags/<name>` pointing at `object` (default `HEAD`) when
/// `annotate` is false, or a full annotated tag object when true.
///
/// Fixed from the source: this takes one boolean `annotate` parameter
/// rather than a stringly-typed `type` argument that the original
/// checked against a boolean internally.
pub fn run(repo: &Repository, annotate: bool, name: Option<&str>, object: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        for (tag_name, _) in refs::list(repo)?
            .get("tags")
            .and_then(|t| match t {
                refs::RefTree::Node(n) => Some(n.clone()),
                _ => None,
            })
            .unwrap_or_default()
        {
            println!("{tag_name}");
        }
        return Ok(());
    };

    let target_name = object.unwrap_or("HEAD");
    let target_oid = resolve::find(repo, target_name, None, false)
        .with_context(|| format!("resolving tag target {target_name}"))?;

    if annotate {
        let target_obj = GitObject::read(repo, &target_oid)?;
        let tag = Tag::build(
            target_oid,
            target_obj.kind().as_str(),
            name,
            &author_line(),
            "",
        );
        let tag_oid = GitObject::Tag(tag).write(repo)?;
        refs::create(repo, &format!("refs/tags/{name}"), &tag_oid)?;
    } else {
        refs::create(repo, &format!("refs/tags/{name}"), &target_oid)?;
    }
    Ok(())
}
