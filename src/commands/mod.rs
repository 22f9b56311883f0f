//! The front end: one module per subcommand, each a thin translation from
//! parsed `clap` args to a core library call plus stdout formatting.
//!
//! Nothing here re-implements core semantics — spec.md §1 treats the CLI as
//! glue around the object store/codec/index core in `min_git::*`, so every
//! function below is a handful of lines gluing a `Repository` lookup to one
//! or two library calls.

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod init;
pub mod ls_files;
pub mod read_tree;
pub mod update_index;
pub mod write_tree;
