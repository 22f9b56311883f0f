//! Component B: the raw, content-addressed, zlib-compressed object store.

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{hash_bytes, ObjectId};
use crate::object::Object;
use crate::repo::Repository;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs;
use std::io::{Read, Write};
use tempfile::NamedTempFile;

/// A handle onto `<root>/.git/objects`.
pub struct ObjectStore<'a> {
    repo: &'a Repository,
}

impl<'a> ObjectStore<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    /// Writes already-framed bytes (as produced by [`Object::encode`]) to
    /// the store, keyed by the SHA-1 of those bytes. Content-addressed
    /// idempotence: if an object with this oid already exists, this is a
    /// no-op — the first writer's bytes are what's observed no matter how
    /// many processes race to create the same oid.
    pub fn write(&self, framed: &[u8]) -> Result<ObjectId> {
        let oid = hash_bytes(framed);
        let path = self.repo.object_path(&oid);
        if path.exists() {
            return Ok(oid);
        }
        let dir = path.parent().expect("object path always has a parent");
        fs::create_dir_all(dir).with_path(dir)?;

        let mut tmp = NamedTempFile::new_in(dir).with_path(dir)?;
        {
            let mut encoder = ZlibEncoder::new(&mut tmp, Compression::default());
            encoder.write_all(framed).with_path(&path)?;
            encoder.finish().with_path(&path)?;
        }
        tmp.persist(&path)
            .map_err(|e| Error::Io {
                path: path.clone(),
                source: e.error,
            })?;
        Ok(oid)
    }

    /// Convenience wrapper: encodes `object` and writes it.
    pub fn write_object(&self, object: &Object) -> Result<ObjectId> {
        self.write(&object.encode())
    }

    /// Reads and zlib-decompresses the framed bytes stored at `oid`.
    pub fn read_raw(&self, oid: &ObjectId) -> Result<Vec<u8>> {
        let path = self.repo.object_path(oid);
        let file = fs::File::open(&path)
            .map_err(|_| Error::ObjectNotFound(oid.to_hex()))?;
        let mut decoder = ZlibDecoder::new(file);
        let mut buf = Vec::new();
        decoder
            .read_to_end(&mut buf)
            .map_err(|_| Error::CorruptObject(oid.to_hex()))?;
        Ok(buf)
    }

    /// Reads and decodes the object stored at `oid`.
    pub fn read_object(&self, oid: &ObjectId) -> Result<Object> {
        let raw = self.read_raw(oid)?;
        Object::decode(&raw)
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.repo.object_path(oid).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Blob;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let object = Object::Blob(Blob::from_content(b"hello\n".to_vec()));
        let oid = store.write_object(&object).unwrap();
        assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
        let read_back = store.read_object(&oid).unwrap();
        assert_eq!(read_back, object);
    }

    #[test]
    fn write_is_idempotent() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let object = Object::Blob(Blob::from_content(b"same content".to_vec()));
        let first = store.write_object(&object).unwrap();
        let second = store.write_object(&object).unwrap();
        assert_eq!(first, second);
        assert!(store.exists(&first));
    }

    #[test]
    fn missing_object_is_not_found() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let oid = ObjectId::from_hex("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef").unwrap();
        let err = store.read_raw(&oid).unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound(_)));
    }

    #[test]
    fn empty_blob_writes_and_hashes_as_expected() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let object = Object::Blob(Blob::from_content(Vec::new()));
        let oid = store.write_object(&object).unwrap();
        assert_eq!(oid.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
        assert!(store.exists(&oid));
    }
}
