use crate::error::{Error, Result};

/// Which object kind a tree entry's mode refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
        }
    }
}

impl std::str::FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Kind::Blob),
            "tree" => Ok(Kind::Tree),
            "commit" => Ok(Kind::Commit),
            other => Err(Error::UnknownObjectType(other.to_string())),
        }
    }
}

const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;
const S_IFDIR: u32 = 0o040000;
const S_IFLNK: u32 = 0o120000;
const S_IFGITLINK: u32 = 0o160000;

/// Classifies a POSIX-like mode into the object kind it references.
///
/// `regular` and `symlink` map to `blob`; `directory` to `tree`; a gitlink
/// (top 4 bits `0o16`) to `commit`; anything else is `UnknownMode`.
pub fn classify(mode: u32) -> Result<Kind> {
    match mode & S_IFMT {
        S_IFREG => Ok(Kind::Blob),
        S_IFLNK => Ok(Kind::Blob),
        S_IFDIR => Ok(Kind::Tree),
        S_IFGITLINK => Ok(Kind::Commit),
        _ => Err(Error::UnknownMode(mode)),
    }
}

/// Normalizes a POSIX mode to the canonical mode stored in objects and the
/// index: `100644`/`100755` for regular files (executable bit preserved),
/// `120000` for symlinks, `040000` for directories, `160000` for gitlinks.
pub fn normalize(mode: u32) -> Result<u32> {
    match mode & S_IFMT {
        S_IFREG => {
            if mode & 0o111 != 0 {
                Ok(S_IFREG | 0o755)
            } else {
                Ok(S_IFREG | 0o644)
            }
        }
        S_IFLNK => Ok(S_IFLNK),
        S_IFDIR => Ok(S_IFDIR),
        S_IFGITLINK => Ok(S_IFGITLINK),
        _ => Err(Error::UnknownMode(mode)),
    }
}

/// Normalizes the mode of a file already inspected via `std::fs::Metadata`,
/// the common case for [`crate::index::ops::add`].
#[cfg(unix)]
pub fn normalize_from_metadata(metadata: &std::fs::Metadata) -> Result<u32> {
    use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        return Ok(S_IFLNK);
    }
    if file_type.is_dir() {
        return Ok(S_IFDIR);
    }
    if file_type.is_socket() || file_type.is_fifo() || file_type.is_block_device() {
        return Err(Error::UnknownMode(metadata.mode()));
    }
    let executable = metadata.permissions().mode() & 0o111 != 0;
    Ok(if executable {
        S_IFREG | 0o755
    } else {
        S_IFREG | 0o644
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_regular_and_executable() {
        assert_eq!(classify(0o100644).unwrap(), Kind::Blob);
        assert_eq!(classify(0o100755).unwrap(), Kind::Blob);
    }

    #[test]
    fn classify_dir_and_gitlink() {
        assert_eq!(classify(0o040000).unwrap(), Kind::Tree);
        assert_eq!(classify(0o160000).unwrap(), Kind::Commit);
    }

    #[test]
    fn classify_symlink() {
        assert_eq!(classify(0o120000).unwrap(), Kind::Blob);
    }

    #[test]
    fn classify_unknown_is_error() {
        assert!(classify(0o020000).is_err());
    }

    #[test]
    fn normalize_preserves_executable_bit() {
        assert_eq!(normalize(0o100664).unwrap(), 0o100644);
        assert_eq!(normalize(0o100775).unwrap(), 0o100755);
    }

    #[test]
    fn normalize_dir_and_gitlink_and_symlink() {
        assert_eq!(normalize(0o040755).unwrap(), 0o040000);
        assert_eq!(normalize(0o160000).unwrap(), 0o160000);
        assert_eq!(normalize(0o120777).unwrap(), 0o120000);
    }
}
