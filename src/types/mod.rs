mod entry;
mod mode;
mod tarfile;

pub use entry::{
    Dir, Entry, File, DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, DEFAULT_OWNER, S_IFDIR, S_IFREG,
};
pub use mode::{ModeChange, ALL_BITS};
pub use tarfile::{Command, Directive, Tarfile};
pub(crate) use tarfile::strip_recursive;
