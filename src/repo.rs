//! Component A: repository discovery and oid/path translation.

use crate::error::{Error, IoResultExt, Result};
use crate::hash::ObjectId;
use std::path::{Path, PathBuf};

const GIT_DIR: &str = ".git";

/// A discovered repository: the working-tree root and its `.git` directory.
#[derive(Clone, Debug)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Walks upward from `start` until an ancestor containing a `.git`
    /// directory is found.
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut cur = start
            .canonicalize()
            .with_path(start)?;
        loop {
            if cur.join(GIT_DIR).is_dir() {
                return Ok(Self { root: cur });
            }
            match cur.parent() {
                Some(parent) => cur = parent.to_path_buf(),
                None => return Err(Error::NotARepository),
            }
        }
    }

    /// Discovers the repository containing the current working directory.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir().with_path(".")?;
        Self::discover_from(&cwd)
    }

    /// Creates the minimal `.git` layout (`objects/`) at `root`, without
    /// requiring one to already exist there.
    pub fn init(root: &Path) -> Result<Self> {
        let git_dir = root.join(GIT_DIR);
        std::fs::create_dir_all(git_dir.join("objects")).with_path(&git_dir)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git_dir(&self) -> PathBuf {
        self.root.join(GIT_DIR)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.git_dir().join("objects")
    }

    pub fn index_path(&self) -> PathBuf {
        self.git_dir().join("index")
    }

    pub fn config_path(&self) -> PathBuf {
        self.git_dir().join("config")
    }

    /// `<root>/.git/objects/<first2>/<remaining38>` for a given oid.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        let (dir, file) = oid.split_hex();
        self.objects_dir().join(dir).join(file)
    }

    /// Expresses an absolute or cwd-relative path as a repository-root
    /// relative, `/`-separated path, the form recorded in the index.
    pub fn relative_to_root(&self, path: &Path) -> Result<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().with_path(".")?.join(path)
        };
        let absolute = absolute
            .canonicalize()
            .unwrap_or(absolute);
        let relative = absolute
            .strip_prefix(&self.root)
            .map_err(|_| Error::PathOutsideRepository(path.to_path_buf()))?;
        let mut components = Vec::new();
        for component in relative.components() {
            match component {
                std::path::Component::Normal(part) => {
                    components.push(part.to_string_lossy().into_owned())
                }
                _ => return Err(Error::PathOutsideRepository(path.to_path_buf())),
            }
        }
        Ok(components.join("/"))
    }

    /// The current working directory expressed relative to the repository
    /// root, `/`-separated (spec.md §4.A `cwd_relative_to_root`).
    pub fn cwd_relative_to_root(&self) -> Result<String> {
        let cwd = std::env::current_dir().with_path(".")?;
        self.relative_to_root(&cwd)
    }

    /// Resolves a hex prefix of length ≥ 4 to the unique matching oid,
    /// scanning `objects/**`. A full 40-character id still has to name an
    /// object actually present in the store — it is not exempt from the
    /// existence check, just from the ambiguity one.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ObjectId> {
        if prefix.len() < 4 {
            return Err(Error::PrefixTooShort(prefix.to_string()));
        }
        if prefix.len() == 40 {
            let oid = ObjectId::from_hex(prefix)?;
            return if self.object_path(&oid).exists() {
                Ok(oid)
            } else {
                Err(Error::ObjectNotFound(prefix.to_string()))
            };
        }
        let (dir_prefix, rest_prefix) = if prefix.len() >= 2 {
            prefix.split_at(2)
        } else {
            ("", prefix)
        };

        let mut matches = Vec::new();
        let objects_dir = self.objects_dir();
        let dir_iter: Box<dyn Iterator<Item = PathBuf>> = if prefix.len() >= 2 {
            Box::new(std::iter::once(objects_dir.join(dir_prefix)))
        } else {
            Box::new(
                std::fs::read_dir(&objects_dir)
                    .with_path(&objects_dir)?
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_dir()),
            )
        };

        for dir in dir_iter {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            let dir_hex = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            for entry in entries.filter_map(|e| e.ok()) {
                let name = entry.file_name().to_string_lossy().into_owned();
                let full_hex = format!("{dir_hex}{name}");
                if full_hex.starts_with(prefix) && full_hex.len() == 40 {
                    let _ = rest_prefix;
                    matches.push(full_hex);
                }
            }
        }

        match matches.len() {
            0 => Err(Error::ObjectNotFound(prefix.to_string())),
            1 => ObjectId::from_hex(&matches[0]),
            count => Err(Error::AmbiguousPrefix {
                prefix: prefix.to_string(),
                count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_objects_dir() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        assert!(repo.objects_dir().is_dir());
    }

    #[test]
    fn discover_from_walks_up_to_root() {
        let dir = tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let repo = Repository::discover_from(&nested).unwrap();
        assert_eq!(
            repo.root().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn discover_from_non_repo_fails() {
        let dir = tempdir().unwrap();
        let err = Repository::discover_from(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotARepository));
    }

    #[test]
    fn object_path_splits_oid() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let oid = ObjectId::from_hex("aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2").unwrap();
        let path = repo.object_path(&oid);
        assert_eq!(
            path,
            repo.objects_dir()
                .join("aa")
                .join("5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2")
        );
    }

    #[test]
    fn resolve_prefix_requires_minimum_length() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let err = repo.resolve_prefix("abc").unwrap_err();
        assert!(matches!(err, Error::PrefixTooShort(_)));
    }

    #[test]
    fn resolve_prefix_finds_unique_match() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let oid = ObjectId::from_hex("aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2").unwrap();
        let (d, f) = oid.split_hex();
        std::fs::create_dir_all(repo.objects_dir().join(&d)).unwrap();
        std::fs::write(repo.objects_dir().join(&d).join(&f), b"x").unwrap();
        let resolved = repo.resolve_prefix("aa5a35").unwrap();
        assert_eq!(resolved, oid);
    }

    #[test]
    fn resolve_prefix_full_length_still_checks_existence() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let oid = ObjectId::from_hex("aa5a352b2e4d1c4ab3906676f0bfc5f5dd10c2f2").unwrap();
        let err = repo.resolve_prefix(&oid.to_hex()).unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound(_)));

        let (d, f) = oid.split_hex();
        std::fs::create_dir_all(repo.objects_dir().join(&d)).unwrap();
        std::fs::write(repo.objects_dir().join(&d).join(&f), b"x").unwrap();
        let resolved = repo.resolve_prefix(&oid.to_hex()).unwrap();
        assert_eq!(resolved, oid);
    }

    #[test]
    fn resolve_prefix_ambiguous() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::create_dir_all(repo.objects_dir().join("aa")).unwrap();
        std::fs::write(
            repo.objects_dir().join("aa").join("5a000000000000000000000000000000000001"),
            b"x",
        )
        .unwrap();
        std::fs::write(
            repo.objects_dir().join("aa").join("5a000000000000000000000000000000000002"),
            b"x",
        )
        .unwrap();
        let err = repo.resolve_prefix("aa5a").unwrap_err();
        assert!(matches!(err, Error::AmbiguousPrefix { .. }));
    }

    #[test]
    fn resolve_prefix_not_found() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::create_dir_all(repo.objects_dir().join("aa")).unwrap();
        let err = repo.resolve_prefix("dead").unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound(_)));
    }
}
