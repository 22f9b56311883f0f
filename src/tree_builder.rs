//! Component H: builds the tree object graph for the current state of an
//! [`Index`], bottom-up, from its flat list of paths.
//!
//! Unlike a working-tree walk, this never touches the filesystem again —
//! every blob is already in the store and every entry already carries its
//! mode and oid. Directories are synthesized purely from path structure.

use crate::error::Result;
use crate::hash::ObjectId;
use crate::index::Index;
use crate::object::{Object, Tree, TreeEntry};
use crate::store::ObjectStore;
use std::collections::{BTreeSet, HashMap};

const DIRECTORY_MODE: u32 = 0o040000;

/// Builds and writes the tree object graph for `index`, returning the root
/// tree's oid. An empty index produces the (valid, content-addressed)
/// empty tree.
pub fn build(store: &ObjectStore, index: &Index) -> Result<ObjectId> {
    let mut dirs: BTreeSet<String> = BTreeSet::new();
    dirs.insert(String::new());
    let mut file_children: HashMap<String, Vec<TreeEntry>> = HashMap::new();

    for entry in index.entries() {
        let (dir, name) = split_parent(&entry.path);
        file_children
            .entry(dir.clone())
            .or_default()
            .push(TreeEntry::new(entry.mode, name, entry.oid));
        dirs.extend(ancestor_dirs(&entry.path));
    }

    // Deepest directories first, so a directory's subtrees are always
    // written before the directory itself needs them.
    let mut ordered: Vec<String> = dirs.into_iter().collect();
    ordered.sort_by_key(|d| std::cmp::Reverse(depth(d)));

    let mut subtree_children: HashMap<String, Vec<TreeEntry>> = HashMap::new();
    let mut root_oid = None;

    for dir in &ordered {
        let mut children = file_children.remove(dir).unwrap_or_default();
        if let Some(subtrees) = subtree_children.remove(dir) {
            children.extend(subtrees);
        }
        let tree = Tree::from_entries(children)?;
        let oid = store.write_object(&Object::Tree(tree))?;

        if dir.is_empty() {
            root_oid = Some(oid);
        } else {
            let (parent, name) = split_parent(dir);
            subtree_children
                .entry(parent)
                .or_default()
                .push(TreeEntry::new(DIRECTORY_MODE, name, oid));
        }
    }

    Ok(root_oid.expect("the root directory (\"\") is always present and processed last"))
}

fn split_parent(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent.to_string(), name.to_string()),
        None => (String::new(), path.to_string()),
    }
}

fn depth(dir: &str) -> usize {
    if dir.is_empty() {
        0
    } else {
        dir.matches('/').count() + 1
    }
}

/// All directory paths on the way from the repository root down to (but
/// not including) `entry_path` itself, including the root (`""`).
fn ancestor_dirs(entry_path: &str) -> Vec<String> {
    let mut components: Vec<&str> = entry_path.split('/').collect();
    components.pop();
    let mut out = Vec::with_capacity(components.len() + 1);
    out.push(String::new());
    let mut acc = String::new();
    for comp in components {
        acc = if acc.is_empty() {
            comp.to_string()
        } else {
            format!("{acc}/{comp}")
        };
        out.push(acc.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::object::Blob;
    use crate::repo::Repository;
    use tempfile::tempdir;

    fn blob_entry(store: &ObjectStore, path: &str, content: &[u8]) -> IndexEntry {
        let oid = store
            .write_object(&Object::Blob(Blob::from_content(content.to_vec())))
            .unwrap();
        IndexEntry {
            ctime_sec: 0,
            ctime_nsec: 0,
            mtime_sec: 0,
            mtime_nsec: 0,
            dev: 0,
            ino: 0,
            mode: 0o100644,
            uid: 0,
            gid: 0,
            file_size: content.len() as u32,
            oid,
            assume_valid: false,
            extended: false,
            stage: 0,
            path: path.to_string(),
        }
    }

    #[test]
    fn empty_index_builds_empty_tree() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let oid = build(&store, &Index::new()).unwrap();
        let tree = match store.read_object(&oid).unwrap() {
            Object::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert!(tree.is_empty());
    }

    #[test]
    fn single_file_matches_s3_tree() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let index = Index::from_entries(vec![blob_entry(&store, "hello", b"hello\n")]);
        let oid = build(&store, &index).unwrap();
        assert_eq!(oid.to_hex(), "aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2");
    }

    #[test]
    fn nested_directories_build_bottom_up() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let index = Index::from_entries(vec![
            blob_entry(&store, "top.txt", b"top\n"),
            blob_entry(&store, "a/one.txt", b"one\n"),
            blob_entry(&store, "a/b/two.txt", b"two\n"),
        ]);
        let root_oid = build(&store, &index).unwrap();

        let root = match store.read_object(&root_oid).unwrap() {
            Object::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(root.entries().len(), 2); // "top.txt", "a"
        let a_entry = root.entries().iter().find(|e| e.name == "a").unwrap();

        let a_tree = match store.read_object(&a_entry.oid).unwrap() {
            Object::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(a_tree.entries().len(), 2); // "one.txt", "b"
        let b_entry = a_tree.entries().iter().find(|e| e.name == "b").unwrap();

        let b_tree = match store.read_object(&b_entry.oid).unwrap() {
            Object::Tree(t) => t,
            _ => panic!("expected tree"),
        };
        assert_eq!(b_tree.entries().len(), 1);
        assert_eq!(b_tree.entries()[0].name, "two.txt");
    }

    #[test]
    fn build_is_independent_of_entry_order() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let forward = Index::from_entries(vec![
            blob_entry(&store, "a/one.txt", b"one\n"),
            blob_entry(&store, "a/two.txt", b"two\n"),
        ]);
        let backward = Index::from_entries(vec![
            blob_entry(&store, "a/two.txt", b"two\n"),
            blob_entry(&store, "a/one.txt", b"one\n"),
        ]);
        assert_eq!(
            build(&store, &forward).unwrap(),
            build(&store, &backward).unwrap()
        );
    }
}
