use anyhow::Result;
use min_git::index::ops;
use min_git::{ObjectStore, Repository};

/// `read-tree id`: expands the named tree into a flat index, replacing
/// whatever index is currently staged.
pub fn run(repo: &Repository, id: &str) -> Result<()> {
    let oid = repo.resolve_prefix(id)?;
    let store = ObjectStore::new(repo);
    let index = ops::from_tree(&store, &oid)?;
    ops::store(repo, &index)?;
    Ok(())
}
