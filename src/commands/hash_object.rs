use anyhow::{Context, Result};
use min_git::{Blob, Object, ObjectStore, Repository};
use std::fs;
use std::path::Path;

/// `hash-object [--write] file`: hashes a file's content as a blob, printing
/// the oid; with `--write`, also writes the blob to the object store.
pub fn run(repo: &Repository, file: &Path, write: bool) -> Result<()> {
    let content = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let object = Object::Blob(Blob::from_content(content));
    let oid = if write {
        let store = ObjectStore::new(repo);
        store.write_object(&object)?
    } else {
        min_git::object::id_of(&object)
    };
    println!("{oid}");
    Ok(())
}
