//! Core engine: object store, index/working-tree reconciliation, and
//! the status/diff machinery that backs the `git-rs` CLI. Every byte of
//! every object is significant here - hashes are computed over exact
//! header+payload bytes, trees have a binary record layout with a
//! specific sort order, and the index is a length-prefixed binary file
//! with 8-byte alignment.

pub mod commit_pipeline;
pub mod config;
pub mod error;
pub mod ignore;
pub mod index;
pub mod object;
pub mod oid;
pub mod refs;
pub mod repo;
pub mod resolve;
pub mod status;
pub mod tree_builder;

pub use error::{GitError, Result};
pub use oid::Oid;
pub use repo::Repository;
