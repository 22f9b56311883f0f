//! The content-addressed object store, object model, and staging index at
//! the core of a minimal Git-compatible version control system.
//!
//! This crate is deliberately just the hard core: repository discovery,
//! the blob/tree/commit object model and its codec, the zlib-compressed
//! object store, and the binary staging index with index↔tree conversion.
//! Ref/branch management, merges, packfiles, and network transports are
//! out of scope — a front end (see `src/commands`) drives this core from
//! the command line.

pub mod config;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod index;
pub mod mode;
pub mod object;
pub mod repo;
pub mod store;
pub mod tree_builder;

pub use config::UserIdentity;
pub use error::{Error, Result};
pub use hash::ObjectId;
pub use index::{Index, IndexEntry};
pub use mode::Kind;
pub use object::{AuthorInfo, Blob, Commit, Object, Tree, TreeEntry};
pub use repo::Repository;
pub use store::ObjectStore;
