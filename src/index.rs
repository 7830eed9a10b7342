//! The binary staging index: `.git/index`, magic `DIRC`, version 2.
//! Entries carry stat metadata, a mode, a sha, flags, and a name, with
//! 8-byte alignment padding after the name's NUL terminator.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{GitError, Result};
use crate::oid::Oid;

const MAGIC: &[u8; 4] = b"DIRC";
const VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeType {
    Regular,
    Symlink,
    Gitlink,
}

impl ModeType {
    fn from_bits(bits: u16) -> Result<ModeType> {
        match bits {
            0b1000 => Ok(ModeType::Regular),
            0b1010 => Ok(ModeType::Symlink),
            0b1110 => Ok(ModeType::Gitlink),
            other => Err(GitError::MalformedIndex(format!(
                "unrecognized mode_type {other:#06b}"
            ))),
        }
    }

    fn bits(&self) -> u16 {
        match self {
            ModeType::Regular => 0b1000,
            ModeType::Symlink => 0b1010,
            ModeType::Gitlink => 0b1110,
        }
    }

    /// The two-digit octal prefix used when building tree-leaf modes
    /// from an index entry (§4.8): `"10"` for regular files and
    /// symlinks (the permission bits distinguish them further), `"16"`
    /// for gitlinks.
    pub fn octal_type_digits(&self) -> &'static str {
        match self {
            ModeType::Regular => "10",
            ModeType::Symlink => "12",
            ModeType::Gitlink => "16",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub ctime_s: u32,
    pub ctime_ns: u32,
    pub mtime_s: u32,
    pub mtime_ns: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode_type: ModeType,
    pub mode_perms: u16,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
    pub sha: Oid,
    pub assume_valid: bool,
    pub stage: u8,
    pub name: String,
}

impl IndexEntry {
    pub fn ctime_ns_total(&self) -> i128 {
        self.ctime_s as i128 * 1_000_000_000 + self.ctime_ns as i128
    }

    pub fn mtime_ns_total(&self) -> i128 {
        self.mtime_s as i128 * 1_000_000_000 + self.mtime_ns as i128
    }

    /// The mode string used in tree leaves: two octal digits of type
    /// plus four of permission, e.g. `"100644"`.
    pub fn tree_mode(&self) -> String {
        format!("{}{:04o}", self.mode_type.octal_type_digits(), self.mode_perms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    pub entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new() -> Index {
        Index { entries: Vec::new() }
    }

    pub fn read(path: &Path) -> Result<Index> {
        if !path.exists() {
            return Ok(Index::new());
        }
        let data = fs::read(path).map_err(GitError::Io)?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Index> {
        let mut cursor = Cursor::new(data);
        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic).map_err(GitError::Io)?;
        if &magic != MAGIC {
            return Err(GitError::MalformedIndex("bad magic".into()));
        }
        let version = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
        if version != VERSION {
            return Err(GitError::MalformedIndex(format!(
                "unsupported index version {version}"
            )));
        }
        let count = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let entry_start = cursor.position();
            let ctime_s = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let ctime_ns = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let mtime_s = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let mtime_ns = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let dev = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let ino = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let reserved = cursor.read_u16::<BigEndian>().map_err(GitError::Io)?;
            if reserved != 0 {
                return Err(GitError::MalformedIndex("reserved bits nonzero".into()));
            }
            let mode = cursor.read_u16::<BigEndian>().map_err(GitError::Io)?;
            let mode_type = ModeType::from_bits((mode >> 12) & 0xF)?;
            let mode_perms = mode & 0x1FF;
            let uid = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let gid = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let size = cursor.read_u32::<BigEndian>().map_err(GitError::Io)?;
            let mut sha_bytes = [0u8; 20];
            cursor.read_exact(&mut sha_bytes).map_err(GitError::Io)?;
            let sha = Oid::from_bytes(sha_bytes);
            let flags = cursor.read_u16::<BigEndian>().map_err(GitError::Io)?;
            let assume_valid = flags & 0x8000 != 0;
            let extended = flags & 0x4000 != 0;
            if extended {
                return Err(GitError::MalformedIndex("extended flag set".into()));
            }
            let stage = ((flags >> 12) & 0x3) as u8;
            let name_len = (flags & 0x0FFF) as usize;

            let name = if name_len < 0xFFF {
                let mut buf = vec![0u8; name_len];
                cursor.read_exact(&mut buf).map_err(GitError::Io)?;
                let mut nul = [0u8; 1];
                cursor.read_exact(&mut nul).map_err(GitError::Io)?;
                String::from_utf8_lossy(&buf).into_owned()
            } else {
                let mut buf = Vec::new();
                loop {
                    let mut byte = [0u8; 1];
                    cursor.read_exact(&mut byte).map_err(GitError::Io)?;
                    if byte[0] == 0 {
                        break;
                    }
                    buf.push(byte[0]);
                }
                String::from_utf8_lossy(&buf).into_owned()
            };

            let consumed = cursor.position() - entry_start;
            let padded = consumed.div_ceil(8) * 8;
            let pad = padded - consumed;
            if pad > 0 {
                let mut skip = vec![0u8; pad as usize];
                cursor.read_exact(&mut skip).map_err(GitError::Io)?;
            }

            entries.push(IndexEntry {
                ctime_s,
                ctime_ns,
                mtime_s,
                mtime_ns,
                dev,
                ino,
                mode_type,
                mode_perms,
                uid,
                gid,
                size,
                sha,
                assume_valid,
                stage,
                name,
            });
        }
        debug!(count = entries.len(), "parsed index");
        Ok(Index { entries })
    }

    /// Serializes the index, sorting entries by name ascending first
    /// (the source does not sort before writing; this is the canonical
    /// behavior implementers should follow so files round-trip with
    /// real Git).
    pub fn serialize(&self) -> Vec<u8> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.write_u32::<BigEndian>(VERSION).unwrap();
        out.write_u32::<BigEndian>(entries.len() as u32).unwrap();

        for entry in &entries {
            let entry_start = out.len();
            out.write_u32::<BigEndian>(entry.ctime_s).unwrap();
            out.write_u32::<BigEndian>(entry.ctime_ns).unwrap();
            out.write_u32::<BigEndian>(entry.mtime_s).unwrap();
            out.write_u32::<BigEndian>(entry.mtime_ns).unwrap();
            out.write_u32::<BigEndian>(entry.dev).unwrap();
            out.write_u32::<BigEndian>(entry.ino).unwrap();
            out.write_u16::<BigEndian>(0).unwrap(); // reserved
            let mode = ((entry.mode_type.bits() & 0xF) << 12) | (entry.mode_perms & 0x1FF);
            out.write_u16::<BigEndian>(mode).unwrap();
            out.write_u32::<BigEndian>(entry.uid).unwrap();
            out.write_u32::<BigEndian>(entry.gid).unwrap();
            out.write_u32::<BigEndian>(entry.size).unwrap();
            out.extend_from_slice(entry.sha.as_bytes());

            let name_bytes = entry.name.as_bytes();
            let name_len = name_bytes.len().min(0xFFF) as u16;
            let mut flags = name_len & 0x0FFF;
            if entry.assume_valid {
                flags |= 0x8000;
            }
            flags |= ((entry.stage as u16) & 0x3) << 12;
            out.write_u16::<BigEndian>(flags).unwrap();
            out.extend_from_slice(name_bytes);
            out.push(0);

            let consumed = out.len() - entry_start;
            let padded = consumed.div_ceil(8) * 8;
            out.resize(out.len() + (padded - consumed), 0);
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let data = self.serialize();
        fs::write(path, data).map_err(GitError::Io)
    }

    pub fn add_or_replace(&mut self, entry: IndexEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(name: &str) -> IndexEntry {
        IndexEntry {
            ctime_s: 1,
            ctime_ns: 2,
            mtime_s: 3,
            mtime_ns: 4,
            dev: 5,
            ino: 6,
            mode_type: ModeType::Regular,
            mode_perms: 0o644,
            uid: 1000,
            gid: 1000,
            size: 42,
            sha: Oid::hash(b"blob 0\0"),
            assume_valid: false,
            stage: 0,
            name: name.to_string(),
        }
    }

    #[test]
    fn empty_index_roundtrip() {
        let idx = Index::new();
        let bytes = idx.serialize();
        assert_eq!(&bytes[..4], MAGIC);
        let parsed = Index::parse(&bytes).unwrap();
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn single_entry_roundtrip() {
        let mut idx = Index::new();
        idx.add_or_replace(sample_entry("a.txt"));
        let bytes = idx.serialize();
        assert_eq!(bytes.len() % 8, 0);
        let parsed = Index::parse(&bytes).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].name, "a.txt");
        assert_eq!(parsed.entries[0].tree_mode(), "100644");
        assert_eq!(parsed.serialize(), bytes);
    }

    #[test]
    fn entries_sorted_by_name_on_write() {
        let mut idx = Index::new();
        idx.add_or_replace(sample_entry("z.txt"));
        idx.add_or_replace(sample_entry("a.txt"));
        let bytes = idx.serialize();
        let parsed = Index::parse(&bytes).unwrap();
        assert_eq!(parsed.entries[0].name, "a.txt");
        assert_eq!(parsed.entries[1].name, "z.txt");
    }

    #[test]
    fn long_name_uses_nul_scan() {
        let long_name = "a/".repeat(1000) + "file.txt";
        let mut idx = Index::new();
        idx.add_or_replace(sample_entry(&long_name));
        let bytes = idx.serialize();
        let parsed = Index::parse(&bytes).unwrap();
        assert_eq!(parsed.entries[0].name, long_name);
    }

    #[test]
    fn bad_magic_is_malformed() {
        let mut bytes = Index::new().serialize();
        bytes[0] = b'X';
        assert!(Index::parse(&bytes).is_err());
    }

    #[test]
    fn remove_and_replace() {
        let mut idx = Index::new();
        idx.add_or_replace(sample_entry("a.txt"));
        idx.add_or_replace(sample_entry("a.txt"));
        assert_eq!(idx.entries.len(), 1);
        assert!(idx.remove("a.txt"));
        assert!(idx.entries.is_empty());
    }
}
