//! Folds an index (a flat list of full paths) into nested tree objects,
//! bottom-up, and returns the root tree's OID.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::index::{Index, IndexEntry};
use crate::object::{GitObject, Tree, TreeLeaf};
use crate::oid::Oid;
use crate::repo::Repository;

/// Builds every directory level implied by `index`'s entries, writes
/// one tree object per directory (deepest first, so a parent can
/// reference its already-written children), and returns the OID of the
/// root tree (`""`). An empty index yields the canonical empty-tree
/// OID `4b825dc642cb6eb9a060e54bf8d69288fbee4904`.
pub fn build_tree_from_index(repo: &Repository, index: &Index) -> Result<Oid> {
    let mut buckets: BTreeMap<String, Vec<IndexEntry>> = BTreeMap::new();
    buckets.entry(String::new()).or_default();

    for entry in &index.entries {
        let mut dir = parent_dir(&entry.name);
        loop {
            buckets.entry(dir.clone()).or_default();
            if dir.is_empty() {
                break;
            }
            dir = parent_dir(&dir);
        }
    }
    for entry in &index.entries {
        let dir = parent_dir(&entry.name);
        buckets.get_mut(&dir).unwrap().push(entry.clone());
    }

    let mut dir_names: Vec<String> = buckets.keys().cloned().collect();
    dir_names.sort_by_key(|b| std::cmp::Reverse(b.len()));

    let mut built: BTreeMap<String, Oid> = BTreeMap::new();

    for dir in dir_names {
        let mut leaves = Vec::new();
        for entry in &buckets[&dir] {
            leaves.push(TreeLeaf {
                mode: entry.tree_mode(),
                name: base_name(&entry.name),
                oid: entry.sha,
            });
        }
        // Any subdirectory of `dir` already built contributes a "040000"
        // leaf named after its own base name. This must be the 6-digit
        // form so `TreeLeaf::is_tree()` (which checks a "04" prefix)
        // recognizes it and sorts it with a trailing "/" - `Tree::parse`
        // normalizes the on-disk 5-digit form to this same 6-digit form,
        // so freshly built and disk-read trees agree on sort key.
        for (candidate, oid) in built.iter() {
            if parent_dir(candidate) == dir && !candidate.is_empty() {
                leaves.push(TreeLeaf {
                    mode: "040000".to_string(),
                    name: base_name(candidate),
                    oid: *oid,
                });
            }
        }

        let tree = Tree { leaves };
        let oid = GitObject::Tree(tree).write(repo)?;
        debug!(dir = %dir, oid = %oid, "wrote tree bucket");
        built.insert(dir, oid);
    }

    Ok(*built.get("").expect("root bucket always present"))
}

fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

fn base_name(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ModeType;

    fn entry(name: &str, oid: Oid) -> IndexEntry {
        IndexEntry {
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
            size: 0,
            sha: oid,
            assume_valid: false,
            stage: 0,
            name: name.to_string(),
        }
    }

    #[test]
    fn empty_index_yields_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::create(dir.path()).unwrap();
        let oid = build_tree_from_index(&repo, &Index::new()).unwrap();
        assert_eq!(oid.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    }

    #[test]
    fn single_file_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::create(dir.path()).unwrap();
        let blob_oid = GitObject::Blob(crate::object::Blob::parse(b"hi\n"))
            .write(&repo)
            .unwrap();
        let mut index = Index::new();
        index.add_or_replace(entry("a.txt", blob_oid));
        let root = build_tree_from_index(&repo, &index).unwrap();
        let tree = match GitObject::read(&repo, &root).unwrap() {
            GitObject::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(tree.leaves.len(), 1);
        assert_eq!(tree.leaves[0].name, "a.txt");
        assert_eq!(tree.leaves[0].oid, blob_oid);
    }

    #[test]
    fn nested_directories_build_bottom_up() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::create(dir.path()).unwrap();
        let blob_oid = GitObject::Blob(crate::object::Blob::parse(b"hi\n"))
            .write(&repo)
            .unwrap();
        let mut index = Index::new();
        index.add_or_replace(entry("src/main.rs", blob_oid));
        index.add_or_replace(entry("README.md", blob_oid));
        let root = build_tree_from_index(&repo, &index).unwrap();
        let tree = match GitObject::read(&repo, &root).unwrap() {
            GitObject::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(tree.leaves.len(), 2);
        let src = tree.leaves.iter().find(|l| l.name == "src").unwrap();
        // Tree::parse normalizes the on-disk 5-digit "40000" to the
        // 6-digit form, so a tree read back always reports "040000".
        assert_eq!(src.mode, "040000");
        let sub = match GitObject::read(&repo, &src.oid).unwrap() {
            GitObject::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(sub.leaves.len(), 1);
        assert_eq!(sub.leaves[0].name, "main.rs");
    }

    /// A directory name that is a prefix of a sibling file (`lib` vs
    /// `lib.rs`) must sort by the tree ordering key, not plain
    /// lexicographic order: `"lib.rs"` < `"lib/"` because `.` (0x2e)
    /// sorts before `/` (0x2f), so `lib.rs` comes first in the tree
    /// even though `"lib" < "lib.rs"` under a bare string compare.
    #[test]
    fn directory_file_prefix_collision_sorts_by_tree_key() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::create(dir.path()).unwrap();
        let blob_oid = GitObject::Blob(crate::object::Blob::parse(b"hi\n"))
            .write(&repo)
            .unwrap();
        let mut index = Index::new();
        index.add_or_replace(entry("lib/x.rs", blob_oid));
        index.add_or_replace(entry("lib.rs", blob_oid));
        let root = build_tree_from_index(&repo, &index).unwrap();
        let tree = match GitObject::read(&repo, &root).unwrap() {
            GitObject::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(tree.leaves.len(), 2);
        assert_eq!(tree.leaves[0].name, "lib.rs");
        assert_eq!(tree.leaves[1].name, "lib");
        assert_eq!(tree.leaves[1].mode, "040000");
    }
}
