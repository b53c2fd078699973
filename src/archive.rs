//! deterministic tar serialization of a tree
//!
//! records are emitted depth-first in child order with gnu headers, uid and
//! gid 0, and every timestamp pinned to 1988-02-01T00:00:00Z, so identical
//! trees always produce identical bytes.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tar::{Builder, EntryType, Header};
use tracing::trace;

use crate::config::Compression;
use crate::error::{Error, IoResultExt, Result};
use crate::types::{Dir, Entry};
use crate::vfs::join;

/// mtime, atime and ctime of every record (1988-02-01T00:00:00Z)
pub const FIXED_MTIME: u64 = 570_672_000;

/// serialize the children of `root` into `out`, returning the writer
///
/// the root directory itself gets no record. file bytes are read from each
/// file's origin as the record is written.
pub fn write_archive<W: Write>(root: &Dir, out: W) -> Result<W> {
    let mut builder = Builder::new(out);
    write_entries(&mut builder, root, "")?;
    builder.into_inner().map_err(|source| Error::Archive {
        path: "<trailer>".to_string(),
        source,
    })
}

fn write_entries<W: Write>(builder: &mut Builder<W>, dir: &Dir, prefix: &str) -> Result<()> {
    for entry in dir.entries() {
        let path = join(prefix, entry.name());
        match entry {
            Entry::Dir(d) => {
                let name = format!("{}/", path);
                let mut header = header_for(entry, EntryType::Directory, 0, &name)?;
                trace!(path = %name, "dir record");
                builder
                    .append_data(&mut header, &name, io::empty())
                    .map_err(|source| archive_err(&name, source))?;
                write_entries(builder, d, &path)?;
            }
            Entry::File(f) => {
                let data = fs::read(&f.origin).with_path(&f.origin)?;
                let mut header =
                    header_for(entry, EntryType::Regular, data.len() as u64, &path)?;
                trace!(path = %path, size = data.len(), "file record");
                builder
                    .append_data(&mut header, &path, data.as_slice())
                    .map_err(|source| archive_err(&path, source))?;
            }
        }
    }
    Ok(())
}

fn header_for(entry: &Entry, kind: EntryType, size: u64, path: &str) -> Result<Header> {
    let mut header = Header::new_gnu();
    header.set_entry_type(kind);
    header.set_mode(entry.archive_mode());
    header.set_uid(0);
    header.set_gid(0);
    header.set_size(size);
    header.set_mtime(FIXED_MTIME);
    header
        .set_username(entry.user())
        .map_err(|source| archive_err(path, source))?;
    header
        .set_groupname(entry.group())
        .map_err(|source| archive_err(path, source))?;
    if let Some(gnu) = header.as_gnu_mut() {
        gnu.set_atime(FIXED_MTIME);
        gnu.set_ctime(FIXED_MTIME);
    }
    Ok(header)
}

fn archive_err(path: &str, source: io::Error) -> Error {
    Error::Archive {
        path: path.to_string(),
        source,
    }
}

/// compress finished archive bytes
pub fn compress(data: Vec<u8>, compression: Compression, level: i32) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(data),
        Compression::Zstd => zstd::encode_all(&data[..], level).map_err(|e| Error::Io {
            path: PathBuf::from("<zstd>"),
            source: e,
        }),
    }
}

/// serialize `root` and apply `compression`
pub fn encode(root: &Dir, compression: Compression, level: i32) -> Result<Vec<u8>> {
    let tar = write_archive(root, Vec::new())?;
    compress(tar, compression, level)
}
