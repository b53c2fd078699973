//! tarbuild - reproducible tar archives from a build file
//!
//! compiles a small declarative build file against a source directory into a
//! single tar archive. directives run against an in-memory tree and the result
//! is serialized with fixed timestamps, so identical inputs always give
//! byte-identical archives.
//!
//! # Core concepts
//!
//! - **Tree**: an in-memory directory of `Dir` and `File` entries, children
//!   sorted by name; files only remember where their bytes live
//! - **Tarfile**: an ordered list of directives (`MKDIR`, `COPY`, `CHMOD`,
//!   `CHOWN`), written as text lines or json
//! - **Context**: the source directory, scanned into a read-only tree and
//!   pruned by per-directory ignore files
//! - **Archive**: gnu tar records, depth-first, mtime/atime/ctime pinned to
//!   1988-02-01T00:00:00Z, optionally zstd compressed
//!
//! # Tarfile format
//!
//! ```text
//! MKDIR /var/lib/app
//! COPY etc /
//! COPY bin/* /usr/bin/
//! CHMOD -R u+x usr/bin
//! CHOWN -R app:app var/lib/app
//! ```
//!
//! globs are matched against paths relative to the tree root.
//!
//! # Example usage
//!
//! ```no_run
//! use std::path::Path;
//! use tarbuild::{ops, Config, Digest};
//!
//! let config = Config::default();
//! let archive = ops::build(Path::new("."), Path::new("Tarfile"), &config).unwrap();
//! println!("{}", Digest::of(&archive));
//! ```

mod config;
mod digest;
mod error;
mod stream;

pub mod archive;
pub mod ops;
pub mod pattern;
pub mod tarfile;
pub mod types;
pub mod vfs;

pub use config::{Compression, Config, DEFAULT_IGNORE_FILE, DEFAULT_TARFILE};
pub use digest::Digest;
pub use error::{Error, IoResultExt, Result};
pub use stream::{is_stdio, read_input, write_output, STDIO};
pub use tarfile::{load_tarfile, parse_tarfile};
pub use types::{Command, Dir, Directive, Entry, File, ModeChange, Tarfile};
