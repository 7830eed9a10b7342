//! Black-box scenario tests against the public library API, exercising
//! full repository lifecycles the way a user driving the CLI would -
//! init, stage, commit, resolve, ignore - against real temporary
//! repositories on disk.

use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

use git_rs::Oid;
use git_rs::Repository;
use git_rs::commit_pipeline;
use git_rs::ignore::GitIgnore;
use git_rs::index::{Index, IndexEntry, ModeType};
use git_rs::object::{Blob, GitObject, ObjectKind};
use git_rs::refs;
use git_rs::resolve;
use git_rs::tree_builder;

fn stage_blob(repo: &Repository, index: &mut Index, name: &str, content: &[u8]) -> Oid {
    let oid = GitObject::Blob(Blob::parse(content)).write(repo).unwrap();
    index.add_or_replace(IndexEntry {
        ctime_s: 0,
        ctime_ns: 0,
        mtime_s: 0,
        mtime_ns: 0,
        dev: 0,
        ino: 0,
        mode_type: ModeType::Regular,
        mode_perms: 0o644,
        uid: 0,
        gid: 0,
        size: content.len() as u32,
        sha: oid,
        assume_valid: false,
        stage: 0,
        name: name.to_string(),
    });
    oid
}

/// S1: hashing a blob's content and storing it reproduces git's
/// canonical object id for that content, and a second write is a no-op.
#[test]
fn s1_blob_hash_and_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::create(dir.path()).unwrap();

    let blob = GitObject::Blob(Blob::parse(b"hello\n"));
    assert_eq!(blob.hash().to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");

    let oid = blob.write(&repo).unwrap();
    let (dir2, file) = oid.fanout_path();
    dir.child(format!(".git/objects/{dir2}/{file}")).assert(predicate::path::is_file());

    let oid_again = blob.write(&repo).unwrap();
    assert_eq!(oid, oid_again);

    let read_back = GitObject::read(&repo, &oid).unwrap();
    assert_eq!(read_back.serialize(), b"hello\n");
}

/// S2: `cat-file` style read-back rejects a kind mismatch.
#[test]
fn s2_cat_file_kind_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::create(dir.path()).unwrap();
    let oid = GitObject::Blob(Blob::parse(b"x")).write(&repo).unwrap();
    let obj = GitObject::read(&repo, &oid).unwrap();
    assert_eq!(obj.kind(), ObjectKind::Blob);
    assert_ne!(obj.kind(), ObjectKind::Tree);
}

/// S3: an index with no entries builds the canonical empty tree id.
#[test]
fn s3_empty_index_yields_canonical_empty_tree() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::create(dir.path()).unwrap();
    let index = Index::new();
    let tree_oid = tree_builder::build_tree_from_index(&repo, &index).unwrap();
    assert_eq!(tree_oid.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
}

/// S4: two commits chain through `parent`, and `HEAD` tracks the branch
/// tip after each one.
#[test]
fn s4_commit_chain_links_parents_and_advances_head() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::create(dir.path()).unwrap();
    let index_path = repo.path(&["index"]);

    let mut index = Index::new();
    stage_blob(&repo, &mut index, "a.txt", b"one\n");
    index.write(&index_path).unwrap();
    let first = commit_pipeline::commit(&repo, "first").unwrap();

    let head_after_first = refs::resolve(&repo, "HEAD").unwrap().unwrap();
    assert_eq!(head_after_first, first);

    let mut index = Index::read(&index_path).unwrap();
    stage_blob(&repo, &mut index, "b.txt", b"two\n");
    index.write(&index_path).unwrap();
    let second = commit_pipeline::commit(&repo, "second").unwrap();

    let GitObject::Commit(commit) = GitObject::read(&repo, &second).unwrap() else {
        panic!("expected a commit object");
    };
    assert_eq!(commit.parents(), vec![first]);

    let head_after_second = refs::resolve(&repo, "HEAD").unwrap().unwrap();
    assert_eq!(head_after_second, second);
    assert_ne!(first, second);
}

/// S5: a short hex prefix that matches more than one object id is
/// reported as ambiguous rather than silently picking one. Rather than
/// brute-force searching for a genuine SHA-1 collision on a 4-char
/// prefix, a second loose object file is placed directly in the same
/// fanout bucket with a name sharing that prefix - `candidates()` only
/// reads directory entries and never has to decompress either object
/// to find them.
#[test]
fn s5_ambiguous_short_hex_is_reported() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::create(dir.path()).unwrap();

    let a = GitObject::Blob(Blob::parse(b"seed-a\n")).write(&repo).unwrap();
    let hex_a = a.to_hex();
    let (fanout_dir, rest_a) = (hex_a[..2].to_string(), hex_a[2..].to_string());

    let mut rest_b = format!("{}{}", &rest_a[..2], "0".repeat(36));
    if rest_b == rest_a {
        rest_b.replace_range(37..38, if &rest_a[37..38] == "0" { "1" } else { "0" });
    }
    let objects_dir = repo.path(&["objects", &fanout_dir]);
    std::fs::write(objects_dir.join(&rest_b), b"not a real compressed object").unwrap();
    let b = Oid::from_hex(&format!("{fanout_dir}{rest_b}")).unwrap();

    let prefix = hex_a[..4].to_string();
    let candidates = resolve::candidates(&repo, &prefix).unwrap();
    assert!(candidates.contains(&a));
    assert!(candidates.contains(&b));

    let err = resolve::find(&repo, &prefix, None, true).unwrap_err();
    assert!(matches!(err, git_rs::GitError::AmbiguousRef { .. }));
}

/// S6: a negated `.gitignore` rule un-ignores a file an earlier,
/// broader rule in the same ruleset would otherwise have excluded.
#[test]
fn s6_gitignore_negation_overrides_earlier_rule() {
    let mut ignore = GitIgnore::new();
    ignore.add_scoped("", "*.log\n!keep.log\n");

    assert!(ignore.check("build.log").unwrap());
    assert!(!ignore.check("keep.log").unwrap());
    assert!(!ignore.check("src/main.rs").unwrap());
}

/// A fresh repository has no commits, so rev-parse on a name that
/// doesn't exist anywhere fails rather than panicking.
#[test]
fn rev_parse_on_fresh_repo_has_no_matches() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::create(dir.path()).unwrap();
    let err = resolve::find(&repo, "deadbeef", None, true).unwrap_err();
    assert!(err.to_string().contains("deadbeef") || matches!(err, git_rs::GitError::NoSuchRef(_)));
}
