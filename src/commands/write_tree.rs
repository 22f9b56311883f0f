use anyhow::Result;
use min_git::index::ops;
use min_git::{ObjectStore, Repository};

/// `write-tree`: builds the tree object graph for the current index,
/// printing the root tree's oid.
pub fn run(repo: &Repository) -> Result<()> {
    let index = ops::load(repo)?;
    let store = ObjectStore::new(repo);
    let oid = min_git::tree_builder::build(&store, &index)?;
    println!("{oid}");
    Ok(())
}
