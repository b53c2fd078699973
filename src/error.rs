use std::path::PathBuf;

/// error type for tarbuild operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no such entry: {0}")]
    NotFound(String),

    #[error("entry already exists: {0}")]
    AlreadyExists(String),

    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("cannot encode archive record {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid compression: {0}")]
    InvalidCompression(String),

    #[error("invalid digest hex: {0}")]
    InvalidDigestHex(String),
}

impl Error {
    pub(crate) fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Error::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// true for errors that mean "nothing at this path"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path_wraps_io_error() {
        let res: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = res.with_path("/tmp/missing").unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, PathBuf::from("/tmp/missing")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::type_mismatch("a/b", "directory", "file");
        assert_eq!(
            err.to_string(),
            "type mismatch at a/b: expected directory, found file"
        );
    }
}
