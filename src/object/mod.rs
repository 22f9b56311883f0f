//! Component E: the object model and its framed, content-addressed codec.
//!
//! Every object kind shares one envelope: `"<type> <len>\0<content>"`. The
//! `ObjectId` is computed over that whole framed byte string (see
//! `crate::hash::hash_bytes`), and the same bytes are what gets
//! zlib-compressed onto disk by [`crate::store::ObjectStore`].

pub mod blob;
pub mod commit;
pub mod tree;

pub use blob::Blob;
pub use commit::{AuthorInfo, Commit};
pub use tree::{Tree, TreeEntry};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::mode::Kind;

/// An in-memory object of any of the three kinds, decoded from or destined
/// for the framed on-disk representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    pub fn kind(&self) -> Kind {
        match self {
            Object::Blob(_) => Kind::Blob,
            Object::Tree(_) => Kind::Tree,
            Object::Commit(_) => Kind::Commit,
        }
    }

    /// Encodes this object into its framed representation: the exact bytes
    /// `ObjectId` is computed over and the object store compresses.
    pub fn encode(&self) -> Vec<u8> {
        let content = match self {
            Object::Blob(b) => b.serialize(),
            Object::Tree(t) => t.serialize(),
            Object::Commit(c) => c.serialize(),
        };
        frame(self.kind(), &content)
    }

    /// Decodes a framed byte string (as read back from the object store)
    /// into the kind-specific structure.
    pub fn decode(data: &[u8]) -> Result<Object> {
        let mut cursor = Cursor::new(data);
        let type_bytes = cursor.read_until(b' ').ok_or_else(|| Error::TruncatedObject {
            expected: 1,
            actual: 0,
        })?;
        let type_str = std::str::from_utf8(type_bytes)
            .map_err(|_| Error::UnknownObjectType(String::from_utf8_lossy(type_bytes).into_owned()))?;
        let kind: Kind = type_str.parse()?;
        let len_bytes = cursor.read_until(0).ok_or_else(|| Error::TruncatedObject {
            expected: 1,
            actual: 0,
        })?;
        let len_str = std::str::from_utf8(len_bytes).map_err(|_| Error::TruncatedObject {
            expected: 1,
            actual: 0,
        })?;
        let expected_len: u64 = len_str.parse().map_err(|_| Error::TruncatedObject {
            expected: 1,
            actual: 0,
        })?;
        let content = cursor.read_all();
        if content.len() as u64 != expected_len {
            return Err(Error::LengthMismatch {
                expected: expected_len,
                actual: content.len() as u64,
            });
        }
        Ok(match kind {
            Kind::Blob => Object::Blob(Blob::from_content(content.to_vec())),
            Kind::Tree => Object::Tree(Tree::parse(content)?),
            Kind::Commit => Object::Commit(Commit::parse(content)?),
        })
    }

    /// Convenience accessor used by `cat-file -p`.
    pub fn pretty_print(&self) -> String {
        match self {
            Object::Blob(b) => String::from_utf8_lossy(b.content()).into_owned(),
            Object::Tree(t) => t.pretty_print(),
            Object::Commit(c) => c.pretty_print(),
        }
    }
}

/// Builds the shared `"<type> <len>\0<content>"` envelope.
pub fn frame(kind: Kind, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 16);
    out.extend_from_slice(kind.as_str().as_bytes());
    out.push(b' ');
    out.extend_from_slice(content.len().to_string().as_bytes());
    out.push(0);
    out.extend_from_slice(content);
    out
}

/// Computes the object id a framed object would hash to, without touching
/// the store — used by [`crate::tree_builder`] and tests.
pub fn id_of(object: &Object) -> ObjectId {
    crate::hash::hash_bytes(&object.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_round_trip() {
        let obj = Object::Blob(Blob::from_content(b"hello\n".to_vec()));
        let encoded = obj.encode();
        assert_eq!(encoded, b"blob 6\0hello\n");
        let decoded = Object::decode(&encoded).unwrap();
        assert_eq!(decoded, obj);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Object::decode(b"frobnicate 1\0x").unwrap_err();
        assert!(matches!(err, Error::UnknownObjectType(_)));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = Object::decode(b"blob 4\0hi").unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }
}
