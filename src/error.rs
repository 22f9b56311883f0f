use std::path::PathBuf;

/// Error type for every core operation (object store, codecs, index).
///
/// The front end (`main.rs`/`commands/`) converts these into a one-line
/// diagnostic on stderr and exit code 1; nothing in the core prints or
/// exits itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a git repository (or any parent up to the filesystem root)")]
    NotARepository,

    #[error("path is outside the repository: {0}")]
    PathOutsideRepository(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("prefix too short, must be at least 4 characters: {0}")]
    PrefixTooShort(String),

    #[error("ambiguous prefix {prefix}: matches {count} objects")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("corrupt object {0}")]
    CorruptObject(String),

    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("truncated object: expected {expected} bytes of content, got {actual}")]
    TruncatedObject { expected: u64, actual: u64 },

    #[error("object length mismatch: header says {expected}, content is {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("malformed tree object: {0}")]
    MalformedTree(String),

    #[error("malformed commit object: {0}")]
    MalformedCommit(String),

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("unsupported index version: {0}")]
    UnsupportedIndexVersion(u32),

    #[error("path not in index: {0}")]
    PathNotInIndex(String),

    #[error("unknown mode: {0:o}")]
    UnknownMode(u32),

    #[error("config value missing: {0}")]
    ConfigMissing(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attaches a path to an [`std::io::Error`], turning it into [`Error::Io`].
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
