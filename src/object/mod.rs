//! The object codec: header construction, SHA-1 over header+payload,
//! zlib (de)compression, and the fanout path
//! `objects/<first-2-hex>/<remaining-38-hex>`.
//!
//! Four object kinds share this codec: [`Blob`] (opaque bytes), [`Tree`]
//! (sorted directory-entry records), and [`Commit`]/[`Tag`], which share
//! the KVLM grammar (see [`kvlm`]).

pub mod blob;
pub mod commit;
pub mod kvlm;
pub mod tag;
pub mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tag::Tag;
pub use tree::{Tree, TreeLeaf};

use std::ffi::CStr;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::{GitError, Result};
use crate::oid::Oid;
use crate::repo::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    pub fn from_str(s: &str) -> Result<ObjectKind> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            "tag" => Ok(ObjectKind::Tag),
            other => Err(GitError::UnknownKind(other.to_string())),
        }
    }

    /// Maps an octal tree-entry mode to the kind of object it
    /// references: `04...` trees, `1600xx` commits (gitlinks,
    /// recognized but never recursed into - submodule recursion is a
    /// non-goal), everything else blobs.
    pub fn from_mode(mode: &str) -> ObjectKind {
        if mode.starts_with("04") {
            ObjectKind::Tree
        } else if mode.starts_with("160000") {
            ObjectKind::Commit
        } else {
            ObjectKind::Blob
        }
    }
}

/// A tagged variant over the four object kinds. `kind_tag()`-style
/// dispatch is a single `match` away via [`GitObject::kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl GitObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            GitObject::Blob(_) => ObjectKind::Blob,
            GitObject::Tree(_) => ObjectKind::Tree,
            GitObject::Commit(_) => ObjectKind::Commit,
            GitObject::Tag(_) => ObjectKind::Tag,
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            GitObject::Blob(b) => b.serialize(),
            GitObject::Tree(t) => t.serialize(),
            GitObject::Commit(c) => c.serialize(),
            GitObject::Tag(t) => t.serialize(),
        }
    }

    pub fn deserialize(kind: ObjectKind, data: &[u8]) -> Result<GitObject> {
        Ok(match kind {
            ObjectKind::Blob => GitObject::Blob(Blob::parse(data)),
            ObjectKind::Tree => GitObject::Tree(Tree::parse(data)?),
            ObjectKind::Commit => GitObject::Commit(Commit::parse(data)?),
            ObjectKind::Tag => GitObject::Tag(Tag::parse(data)?),
        })
    }

    /// `SHA1(kind SP ascii(len) NUL payload)`, without touching disk.
    pub fn hash(&self) -> Oid {
        Oid::hash(&self.full_bytes())
    }

    fn full_bytes(&self) -> Vec<u8> {
        let payload = self.serialize();
        let mut out = format!("{} {}\0", self.kind().as_str(), payload.len()).into_bytes();
        out.extend_from_slice(&payload);
        out
    }

    /// Reads and deserializes the object stored at `oid`'s fanout path.
    pub fn read(repo: &Repository, oid: &Oid) -> Result<GitObject> {
        let (dir, file) = oid.fanout_path();
        let path = repo.path(&["objects", &dir, &file]);
        let f = File::open(&path).map_err(GitError::Io)?;
        let decoder = ZlibDecoder::new(f);
        let mut reader = BufReader::new(decoder);

        let mut header_buf = Vec::new();
        reader
            .read_until(0, &mut header_buf)
            .map_err(GitError::Io)?;
        let header = CStr::from_bytes_with_nul(&header_buf).map_err(|_| GitError::MalformedObject {
            oid: oid.to_hex(),
            reason: "header missing NUL terminator".into(),
        })?;
        let header = header.to_str().map_err(|_| GitError::MalformedObject {
            oid: oid.to_hex(),
            reason: "header is not valid UTF-8".into(),
        })?;
        let (kind_str, size_str) = header.split_once(' ').ok_or_else(|| GitError::MalformedObject {
            oid: oid.to_hex(),
            reason: "header missing kind/size separator".into(),
        })?;
        let kind = ObjectKind::from_str(kind_str)?;
        let expected_size: usize = size_str.parse().map_err(|_| GitError::MalformedObject {
            oid: oid.to_hex(),
            reason: "size is not a number".into(),
        })?;

        let mut payload = Vec::new();
        reader.read_to_end(&mut payload).map_err(GitError::Io)?;
        if payload.len() != expected_size {
            return Err(GitError::MalformedObject {
                oid: oid.to_hex(),
                reason: format!(
                    "size mismatch: header says {expected_size}, found {}",
                    payload.len()
                ),
            });
        }
        trace!(oid = %oid, kind = kind.as_str(), "read object");
        Self::deserialize(kind, &payload)
    }

    /// Serializes, hashes, zlib-compresses, and writes atomically to the
    /// fanout path. A no-op if the target already exists - objects are
    /// immutable once written.
    pub fn write(&self, repo: &Repository) -> Result<Oid> {
        let data = self.full_bytes();
        let oid = Oid::hash(&data);
        let (dir, file) = oid.fanout_path();
        let dir_path = repo.path(&["objects", &dir]);
        fs::create_dir_all(&dir_path).map_err(GitError::Io)?;
        let target = dir_path.join(&file);
        if target.exists() {
            return Ok(oid);
        }

        let mut tmp = NamedTempFile::new_in(&dir_path).map_err(GitError::Io)?;
        {
            let mut encoder = ZlibEncoder::new(&mut tmp, Compression::default());
            encoder.write_all(&data).map_err(GitError::Io)?;
            encoder.finish().map_err(GitError::Io)?;
        }
        tmp.persist(&target)
            .map_err(|e| GitError::Io(e.error))?;
        trace!(oid = %oid, kind = self.kind().as_str(), "wrote object");
        Ok(oid)
    }
}
