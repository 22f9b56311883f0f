use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::mode::{self, Kind};
use std::cmp::Ordering;
use std::collections::HashSet;

/// One `(mode, name, oid)` entry of a [`Tree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: u32,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: u32, name: impl Into<String>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// The object kind this entry's mode refers to (blob, tree, or commit
    /// for a submodule gitlink).
    pub fn kind(&self) -> Result<Kind> {
        mode::classify(self.mode)
    }

    fn serialize_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("{:o}", self.mode).as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.name.as_bytes());
        out.push(0);
        out.extend_from_slice(self.oid.as_bytes());
    }
}

/// An ordered sequence of [`TreeEntry`] with names unique within the tree.
///
/// Entries are always held sorted per the comparator in spec.md §4.E: plain
/// byte-lexicographic order, except that a directory name is compared as if
/// it had a trailing `/` — so `"foo"` (a file) sorts before `"foo.txt"`, but
/// `"foo"` (a directory) sorts after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Builds a tree from an unordered, name-unique set of entries, sorting
    /// them into the canonical write order. Rejects duplicate names.
    pub fn from_entries(mut entries: Vec<TreeEntry>) -> Result<Self> {
        entries.sort_by(compare_entries);
        for pair in entries.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(Error::MalformedTree(format!(
                    "duplicate entry name: {}",
                    pair[0].name
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            entry.serialize_into(&mut out);
        }
        out
    }

    pub fn parse(content: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(content);
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        while !cursor.is_eof() {
            let mode_bytes = cursor
                .read_until(b' ')
                .ok_or_else(|| Error::MalformedTree("missing mode/name delimiter".into()))?;
            let mode_str = std::str::from_utf8(mode_bytes)
                .map_err(|_| Error::MalformedTree("entry mode is not valid UTF-8".into()))?;
            let mode = u32::from_str_radix(mode_str, 8)
                .map_err(|_| Error::MalformedTree(format!("invalid octal mode: {mode_str}")))?;
            let name_bytes = cursor
                .read_until(0)
                .ok_or_else(|| Error::MalformedTree("missing NUL after entry name".into()))?;
            let name = String::from_utf8(name_bytes.to_vec())
                .map_err(|_| Error::MalformedTree("entry name is not valid UTF-8".into()))?;
            let oid_bytes = cursor
                .read_n(ObjectId::LEN)
                .ok_or_else(|| Error::MalformedTree("truncated entry oid".into()))?;
            let mut raw = [0u8; ObjectId::LEN];
            raw.copy_from_slice(oid_bytes);
            if !seen.insert(name.clone()) {
                return Err(Error::MalformedTree(format!("duplicate entry name: {name}")));
            }
            entries.push(TreeEntry::new(mode, name, ObjectId::from_bytes(raw)));
        }
        Ok(Self { entries })
    }

    /// `"<mode:06o> <kind> <oid>\t<name>"` per entry, one line each — the
    /// "pretty content" for a tree per spec.md §6, and what an `ls-tree`
    /// listing would have shown.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let kind = entry.kind().map(Kind::as_str).unwrap_or("unknown");
            out.push_str(&format!(
                "{:06o} {} {}\t{}\n",
                entry.mode, kind, entry.oid, entry.name
            ));
        }
        out
    }
}

fn compare_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    let af = a.name.as_bytes();
    let bf = b.name.as_bytes();
    let min_len = af.len().min(bf.len());
    match af[..min_len].cmp(&bf[..min_len]) {
        Ordering::Equal => {}
        other => return other,
    }
    let a_is_tree = matches!(a.kind(), Ok(Kind::Tree));
    let b_is_tree = matches!(b.kind(), Ok(Kind::Tree));
    let a1 = af.get(min_len).copied().or(a_is_tree.then_some(b'/'));
    let b1 = bf.get(min_len).copied().or(b_is_tree.then_some(b'/'));
    a1.cmp(&b1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_bytes([byte; 20])
    }

    #[test]
    fn s3_single_blob_tree_round_trips() {
        let hello_oid =
            ObjectId::from_hex("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();
        let tree = Tree::from_entries(vec![TreeEntry::new(0o100644, "hello", hello_oid)]).unwrap();
        let body = tree.serialize();
        assert_eq!(body, {
            let mut expected = b"100644 hello\0".to_vec();
            expected.extend_from_slice(hello_oid.as_bytes());
            expected
        });
        let framed = crate::object::frame(Kind::Tree, &body);
        let id = crate::hash::hash_bytes(&framed);
        assert_eq!(id.to_hex(), "aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2");

        let parsed = Tree::parse(&body).unwrap();
        assert_eq!(parsed, tree);
    }

    #[test]
    fn directory_sorts_after_same_prefixed_file() {
        // "foo" (dir) vs "foo.txt" (file): "foo" dir compares as "foo/" > "foo.txt".
        let tree = Tree::from_entries(vec![
            TreeEntry::new(0o040000, "foo", oid(1)),
            TreeEntry::new(0o100644, "foo.txt", oid(2)),
        ])
        .unwrap();
        assert_eq!(tree.entries()[0].name, "foo.txt");
        assert_eq!(tree.entries()[1].name, "foo");
    }

    #[test]
    fn plain_file_prefix_sorts_before_longer_name() {
        let tree = Tree::from_entries(vec![
            TreeEntry::new(0o100644, "foo.txt", oid(1)),
            TreeEntry::new(0o100644, "foo", oid(2)),
        ])
        .unwrap();
        assert_eq!(tree.entries()[0].name, "foo");
        assert_eq!(tree.entries()[1].name, "foo.txt");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Tree::from_entries(vec![
            TreeEntry::new(0o100644, "a", oid(1)),
            TreeEntry::new(0o100644, "a", oid(2)),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::MalformedTree(_)));
    }

    #[test]
    fn byte_encoding_is_a_function_of_the_entry_set() {
        // Property 6: two builders producing the same set produce identical bytes.
        let t1 = Tree::from_entries(vec![
            TreeEntry::new(0o100644, "b", oid(2)),
            TreeEntry::new(0o100644, "a", oid(1)),
        ])
        .unwrap();
        let t2 = Tree::from_entries(vec![
            TreeEntry::new(0o100644, "a", oid(1)),
            TreeEntry::new(0o100644, "b", oid(2)),
        ])
        .unwrap();
        assert_eq!(t1.serialize(), t2.serialize());
    }
}
