//! Component G: index load/store and the operations that mutate it against
//! the working tree and the object store.

use super::codec;
use super::{Index, IndexEntry};
use crate::error::{Error, IoResultExt, Result};
use crate::hash::ObjectId;
use crate::mode;
use crate::object::{Blob, Object};
use crate::repo::Repository;
use crate::store::ObjectStore;
use std::fs;
use std::os::unix::fs::MetadataExt;
use tempfile::NamedTempFile;

/// Reads `<root>/.git/index`, or an empty index if it doesn't exist yet —
/// an uninitialized index is indistinguishable from an empty one.
pub fn load(repo: &Repository) -> Result<Index> {
    let path = repo.index_path();
    if !path.exists() {
        return Ok(Index::new());
    }
    let bytes = fs::read(&path).with_path(&path)?;
    codec::decode_index(&bytes)
}

/// Atomically overwrites `<root>/.git/index` with `index`'s contents:
/// write to a temp file in the same directory, then rename into place, so a
/// crash mid-write never leaves a half-written index on disk.
pub fn store(repo: &Repository, index: &Index) -> Result<()> {
    let path = repo.index_path();
    let dir = repo.git_dir();
    fs::create_dir_all(&dir).with_path(&dir)?;
    let bytes = codec::encode_index(index);
    let mut tmp = NamedTempFile::new_in(&dir).with_path(&dir)?;
    std::io::Write::write_all(&mut tmp, &bytes).with_path(&path)?;
    tmp.persist(&path).map_err(|e| Error::Io {
        path: path.clone(),
        source: e.error,
    })?;
    log::debug!("wrote index with {} entries", index.len());
    Ok(())
}

/// Reads the content a blob should hold for the file at `abs`. Never
/// dereferences a symlink: its blob content is its link-target text, read
/// via readlink, not the bytes of whatever it points at.
fn read_content(abs: &std::path::Path, metadata: &std::fs::Metadata, path: &str) -> Result<Vec<u8>> {
    if metadata.file_type().is_symlink() {
        Ok(fs::read_link(abs)
            .with_path(abs)?
            .into_os_string()
            .into_string()
            .map_err(|_| Error::CorruptIndex(format!("symlink target at {path} is not valid UTF-8")))?
            .into_bytes())
    } else {
        fs::read(abs).with_path(abs)
    }
}

fn stat_entry(repo: &Repository, store: &ObjectStore, path: &str) -> Result<IndexEntry> {
    let abs = repo.root().join(path);
    let metadata = fs::symlink_metadata(&abs).with_path(&abs)?;
    let mode = mode::normalize_from_metadata(&metadata)?;
    let content = read_content(&abs, &metadata, path)?;
    let file_size = content.len() as u32;
    let oid = store.write_object(&Object::Blob(Blob::from_content(content)))?;

    let ctime_ns = metadata.ctime() as i64 * 1_000_000_000 + metadata.ctime_nsec();
    let mtime_ns = metadata.mtime() as i64 * 1_000_000_000 + metadata.mtime_nsec();

    Ok(IndexEntry {
        ctime_sec: (ctime_ns / 1_000_000_000) as u32,
        ctime_nsec: (ctime_ns % 1_000_000_000) as u32,
        mtime_sec: (mtime_ns / 1_000_000_000) as u32,
        mtime_nsec: (mtime_ns % 1_000_000_000) as u32,
        dev: metadata.dev() as u32,
        ino: metadata.ino() as u32,
        mode,
        uid: metadata.uid(),
        gid: metadata.gid(),
        file_size,
        oid,
        assume_valid: false,
        extended: false,
        stage: 0,
        path: path.to_string(),
    })
}

/// Stats and hashes the file at `path` (repository-root relative) and
/// inserts or replaces its entry in `index`.
pub fn add(repo: &Repository, store: &ObjectStore, index: &mut Index, path: &str) -> Result<()> {
    let entry = stat_entry(repo, store, path)?;
    log::debug!("add {path} -> {}", entry.oid);
    index.insert(entry);
    Ok(())
}

/// Re-stats every entry named in `paths` against two independent
/// conditions (spec.md §4.G.refresh): an mtime advance re-hashes the file's
/// content and updates only `oid`/`file_size`/`mtime_*`; a ctime advance
/// re-normalizes the mode and updates only `mode`/`ctime_*`. `dev`, `ino`,
/// `uid`, `gid` are never touched here — they are informational stat-cache
/// fields recorded once at `add` time and play no part in the oid. Errors
/// with [`Error::PathNotInIndex`] for any path not already present.
pub fn refresh(
    repo: &Repository,
    store: &ObjectStore,
    index: &mut Index,
    paths: &[String],
) -> Result<()> {
    for path in paths {
        if !index.contains(path) {
            return Err(Error::PathNotInIndex(path.clone()));
        }
        let abs = repo.root().join(path);
        let metadata = fs::symlink_metadata(&abs).with_path(&abs)?;
        let ctime_ns = metadata.ctime() as i64 * 1_000_000_000 + metadata.ctime_nsec();
        let mtime_ns = metadata.mtime() as i64 * 1_000_000_000 + metadata.mtime_nsec();

        let existing = index.get(path).expect("checked contains above");
        let existing_ctime_ns =
            existing.ctime_sec as i64 * 1_000_000_000 + existing.ctime_nsec as i64;
        let existing_mtime_ns =
            existing.mtime_sec as i64 * 1_000_000_000 + existing.mtime_nsec as i64;

        if mtime_ns > existing_mtime_ns {
            log::debug!("refresh {path}: mtime advanced, re-hashing content");
            let content = read_content(&abs, &metadata, path)?;
            let file_size = content.len() as u32;
            let oid = store.write_object(&Object::Blob(Blob::from_content(content)))?;
            let mut updated = index.get(path).expect("checked contains above").clone();
            updated.oid = oid;
            updated.file_size = file_size;
            updated.mtime_sec = (mtime_ns / 1_000_000_000) as u32;
            updated.mtime_nsec = (mtime_ns % 1_000_000_000) as u32;
            index.insert(updated);
        }

        if ctime_ns > existing_ctime_ns {
            log::debug!("refresh {path}: ctime advanced, re-normalizing mode");
            let mode = mode::normalize_from_metadata(&metadata)?;
            let mut updated = index.get(path).expect("checked contains above").clone();
            updated.mode = mode;
            updated.ctime_sec = (ctime_ns / 1_000_000_000) as u32;
            updated.ctime_nsec = (ctime_ns % 1_000_000_000) as u32;
            index.insert(updated);
        }
    }
    Ok(())
}

/// Expands a tree object (recursively) into a flat, path-sorted [`Index`] —
/// the inverse of [`crate::tree_builder::build`].
pub fn from_tree(store: &ObjectStore, tree_oid: &ObjectId) -> Result<Index> {
    let mut entries = Vec::new();
    expand_tree(store, tree_oid, "", &mut entries)?;
    Ok(Index::from_entries(entries))
}

fn expand_tree(
    store: &ObjectStore,
    tree_oid: &ObjectId,
    prefix: &str,
    out: &mut Vec<IndexEntry>,
) -> Result<()> {
    let tree = match store.read_object(tree_oid)? {
        Object::Tree(t) => t,
        other => {
            return Err(Error::MalformedTree(format!(
                "expected tree object, got {}",
                other.kind().as_str()
            )))
        }
    };
    for entry in tree.entries() {
        let full_path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        match entry.kind()? {
            mode::Kind::Tree => expand_tree(store, &entry.oid, &full_path, out)?,
            _ => out.push(IndexEntry {
                ctime_sec: 0,
                ctime_nsec: 0,
                mtime_sec: 0,
                mtime_nsec: 0,
                dev: 0,
                ino: 0,
                mode: entry.mode,
                uid: 0,
                gid: 0,
                file_size: 0,
                oid: entry.oid,
                assume_valid: false,
                extended: false,
                stage: 0,
                path: full_path,
            }),
        }
    }
    Ok(())
}
