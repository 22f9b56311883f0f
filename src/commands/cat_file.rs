use anyhow::{bail, Result};
use min_git::{ObjectStore, Repository};

/// `cat-file {-t|-p} id`: prints an object's kind (`-t`) or its pretty
/// content (`-p`), per spec.md §6.
pub fn run(repo: &Repository, id: &str, show_type: bool, pretty_print: bool) -> Result<()> {
    if show_type == pretty_print {
        bail!("cat-file: exactly one of -t or -p is required");
    }
    let oid = repo.resolve_prefix(id)?;
    let store = ObjectStore::new(repo);
    let object = store.read_object(&oid)?;
    if show_type {
        println!("{}", object.kind().as_str());
    } else if pretty_print {
        print!("{}", object.pretty_print());
    }
    Ok(())
}
