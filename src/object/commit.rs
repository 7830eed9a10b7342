use crate::error::Result;
use crate::object::kvlm::Kvlm;
use crate::oid::Oid;

/// A commit: KVLM with conventional keys `tree`, `parent` (0..n),
/// `author`, `committer`, optional `gpgsig`, plus message. A root
/// commit has no `parent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub kvlm: Kvlm,
}

impl Commit {
    pub fn parse(data: &[u8]) -> Result<Commit> {
        Ok(Commit {
            kvlm: Kvlm::parse(data),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    pub fn tree(&self) -> Option<Oid> {
        self.kvlm.get("tree").and_then(|s| Oid::from_hex(s).ok())
    }

    pub fn parents(&self) -> Vec<Oid> {
        self.kvlm
            .get_all("parent")
            .into_iter()
            .filter_map(|s| Oid::from_hex(s).ok())
            .collect()
    }

    pub fn author(&self) -> Option<&str> {
        self.kvlm.get("author")
    }

    pub fn committer(&self) -> Option<&str> {
        self.kvlm.get("committer")
    }

    pub fn message(&self) -> &str {
        &self.kvlm.message
    }

    /// Builds a new commit from its constituent parts, as the commit
    /// pipeline (§4.11) does: tree, zero-or-more parents, an
    /// author/committer line of the form `"<identity> <unix_seconds>
    /// <±HHMM>"`, and a free-form message.
    pub fn build(tree: Oid, parents: &[Oid], author_line: &str, message: &str) -> Commit {
        let mut kvlm = Kvlm::new();
        kvlm.append("tree", tree.to_hex());
        for parent in parents {
            kvlm.append("parent", parent.to_hex());
        }
        kvlm.append("author", author_line);
        kvlm.append("committer", author_line);
        kvlm.message = message.to_string();
        Commit { kvlm }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_parse_roundtrip() {
        let tree = Oid::hash(b"tree 0\0");
        let parent = Oid::hash(b"commit 0\0");
        let commit = Commit::build(
            tree,
            &[parent],
            "Alice <alice@example.com> 1697750400 +0530",
            "Initial commit\n",
        );
        let bytes = commit.serialize();
        let parsed = Commit::parse(&bytes).unwrap();
        assert_eq!(parsed.tree(), Some(tree));
        assert_eq!(parsed.parents(), vec![parent]);
        assert_eq!(parsed.message(), "Initial commit\n");
    }

    #[test]
    fn root_commit_has_no_parent() {
        let tree = Oid::hash(b"tree 0\0");
        let commit = Commit::build(tree, &[], "Alice <a@b.c> 1 +0000", "root\n");
        assert!(commit.parents().is_empty());
        assert!(!String::from_utf8_lossy(&commit.serialize()).contains("parent"));
    }
}
