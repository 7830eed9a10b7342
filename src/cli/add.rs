use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use anyhow::{Result, bail};

use git_rs::Repository;
use git_rs::index::{Index, IndexEntry, ModeType};
use git_rs::object::{Blob, GitObject};

pub fn run(repo: &Repository, paths: &[String]) -> Result<()> {
    let index_path = repo.path(&["index"]);
    let mut index = Index::read(&index_path)?;

    for path in paths {
        stage_one(repo, &mut index, path)?;
    }

    index.write(&index_path)?;
    Ok(())
}

fn stage_one(repo: &Repository, index: &mut Index, path: &str) -> Result<()> {
    let candidate = Path::new(path);
    let abs = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        std::env::current_dir()?.join(candidate)
    };
    let abs = abs.canonicalize()?;
    let rel = abs
        .strip_prefix(repo.worktree())
        .map_err(|_| anyhow::anyhow!("path '{path}' is outside the worktree"))?
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/");

    let meta = fs::symlink_metadata(&abs)?;
    if meta.is_dir() {
        bail!("'{path}' is a directory; add files individually");
    }

    let data = fs::read(&abs)?;
    let blob_oid = GitObject::Blob(Blob::parse(&data)).write(repo)?;

    let mode_type = if meta.file_type().is_symlink() {
        ModeType::Symlink
    } else {
        ModeType::Regular
    };
    let mode_perms = (meta.mode() & 0o777) as u16;

    let entry = IndexEntry {
        ctime_s: meta.ctime() as u32,
        ctime_ns: meta.ctime_nsec() as u32,
        mtime_s: meta.mtime() as u32,
        mtime_ns: meta.mtime_nsec() as u32,
        dev: meta.dev() as u32,
        ino: meta.ino() as u32,
        mode_type,
        mode_perms,
        uid: meta.uid(),
        gid: meta.gid(),
        size: meta.size() as u32,
        sha: blob_oid,
        assume_valid: false,
        stage: 0,
        name: rel,
    };
    index.add_or_replace(entry);
    Ok(())
}
