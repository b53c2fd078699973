//! path-addressed operations on an in-memory directory tree
//!
//! every path is resolved from the directory the method is called on,
//! whatever its leading slash. methods that change structure, or that hand
//! out mutable access below a directory, mark each directory on the path
//! stale so `deep_entries` never serves an outdated list.

mod ignore;
mod path;
mod scan;

use std::borrow::Cow;
use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::types::{Dir, Entry, File};

pub use path::{clean_path, join, split_parent};

impl Dir {
    /// resolve an entry below this directory
    ///
    /// the root path is not an entry of itself; use `get_dir` for it.
    pub fn get_entry(&self, path: &str) -> Result<&Entry> {
        let clean = clean_path(path);
        let (parent, name) = split_parent(&clean);
        if name.is_empty() {
            return Err(Error::NotFound(path::display(&clean)));
        }
        self.walk(parent, &clean)?
            .child(name)
            .ok_or_else(|| Error::NotFound(path::display(&clean)))
    }

    /// resolve a directory; the root path yields this directory
    pub fn get_dir(&self, path: &str) -> Result<&Dir> {
        let clean = clean_path(path);
        self.walk(&clean, &clean)
    }

    /// resolve a file
    pub fn get_file(&self, path: &str) -> Result<&File> {
        let entry = self.get_entry(path)?;
        entry.as_file().ok_or_else(|| {
            Error::type_mismatch(path::display(&clean_path(path)), "file", entry.type_name())
        })
    }

    pub(crate) fn get_entry_mut(&mut self, path: &str) -> Result<&mut Entry> {
        let clean = clean_path(path);
        let (parent, name) = split_parent(&clean);
        if name.is_empty() {
            return Err(Error::NotFound(path::display(&clean)));
        }
        let shown = path::display(&clean);
        self.walk_mut(parent, &clean)?
            .child_mut(name)
            .ok_or(Error::NotFound(shown))
    }

    #[cfg(test)]
    pub(crate) fn get_dir_mut(&mut self, path: &str) -> Result<&mut Dir> {
        let clean = clean_path(path);
        self.walk_mut(&clean, &clean)
    }

    /// read the bytes behind a file entry from its origin
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.get_file(path)?;
        fs::read(&file.origin).with_path(&file.origin)
    }

    /// create one directory inside an existing directory
    pub fn mkdir(&mut self, path: &str) -> Result<&mut Dir> {
        let clean = clean_path(path);
        let (parent, name) = split_parent(&clean);
        if name.is_empty() {
            return Err(Error::AlreadyExists(path::display(&clean)));
        }

        let dir = self.walk_mut(parent, &clean)?;
        if dir.child(name).is_some() {
            return Err(Error::AlreadyExists(path::display(&clean)));
        }

        dir.insert(Entry::Dir(Dir::named(name)))
            .as_dir_mut()
            .ok_or_else(|| Error::type_mismatch(path::display(&clean), "directory", "file"))
    }

    /// create every missing directory along `path`
    ///
    /// succeeds when the path already is a directory; fails on the first
    /// segment that is a file.
    pub fn mkdir_all(&mut self, path: &str) -> Result<&mut Dir> {
        let clean = clean_path(path);
        let mut dir = self;
        for segment in path::segments(&clean) {
            if dir.child(segment).is_none() {
                dir.insert(Entry::Dir(Dir::named(segment)));
            }
            dir = match dir.child_mut(segment) {
                Some(Entry::Dir(d)) => d,
                Some(Entry::File(_)) => {
                    return Err(Error::type_mismatch(
                        path::display(&clean),
                        "directory",
                        "file",
                    ))
                }
                None => return Err(Error::NotFound(path::display(&clean))),
            };
        }
        dir.stale = true;
        Ok(dir)
    }

    /// create a file with default attributes bound to `origin`
    ///
    /// missing parent directories are created; an existing entry at `path`
    /// is an error.
    pub fn add_file(&mut self, path: &str, origin: impl Into<std::path::PathBuf>) -> Result<&mut File> {
        let clean = clean_path(path);
        let (parent, name) = split_parent(&clean);
        if name.is_empty() {
            return Err(Error::AlreadyExists(path::display(&clean)));
        }

        let dir = self.mkdir_all(parent)?;
        if dir.child(name).is_some() {
            return Err(Error::AlreadyExists(path::display(&clean)));
        }

        dir.insert(Entry::File(File::new(name, origin)))
            .as_file_mut()
            .ok_or_else(|| Error::type_mismatch(path::display(&clean), "file", "directory"))
    }

    /// insert a copy of `entry` at `path`, named after the last segment
    ///
    /// an existing directory absorbs an incoming directory's children
    /// (recursively, keeping its own attributes); an existing file is
    /// replaced by an incoming file; a file meeting a directory is a type
    /// clash. the root path merges an incoming directory into this one.
    pub fn add(&mut self, path: &str, entry: &Entry) -> Result<()> {
        let clean = clean_path(path);
        let (parent, name) = split_parent(&clean);

        if name.is_empty() {
            return match entry {
                Entry::Dir(incoming) => merge_dirs(self, incoming.clone(), ""),
                Entry::File(_) => Err(Error::type_mismatch("/", "directory", "file")),
            };
        }

        let mut incoming = entry.clone();
        incoming.set_name(name);

        let dir = self.mkdir_all(parent)?;
        merge_child(dir, incoming, &clean)
    }

    /// detach the entry at `path`, with all its descendants
    pub fn remove(&mut self, path: &str) -> Result<Entry> {
        let clean = clean_path(path);
        let (parent, name) = split_parent(&clean);
        if name.is_empty() {
            return Err(Error::NotFound(path::display(&clean)));
        }

        let shown = path::display(&clean);
        self.walk_mut(parent, &clean)?
            .take(name)
            .ok_or(Error::NotFound(shown))
    }

    /// every descendant path, sorted
    ///
    /// served from the baked cache when it is current, computed otherwise.
    pub fn deep_entries(&self) -> Cow<'_, [String]> {
        if self.stale {
            Cow::Owned(self.collect_deep_entries())
        } else {
            Cow::Borrowed(&self.deep_entries)
        }
    }

    /// recompute and store the deep entries of this directory and all
    /// subdirectories, bottom-up
    pub fn bake_deep_entries(&mut self) {
        for entry in &mut self.entries {
            if let Entry::Dir(d) = entry {
                d.bake_deep_entries();
            }
        }
        self.deep_entries = self.collect_deep_entries();
        self.stale = false;
    }

    fn collect_deep_entries(&self) -> Vec<String> {
        let mut deep = Vec::new();
        for entry in &self.entries {
            deep.push(entry.name().to_string());
            if let Entry::Dir(d) = entry {
                deep.extend(d.deep_entries().iter().map(|c| join(d.name(), c)));
            }
        }
        deep.sort();
        deep
    }

    fn walk(&self, clean: &str, full: &str) -> Result<&Dir> {
        let mut dir = self;
        for segment in path::segments(clean) {
            dir = match dir.child(segment) {
                Some(Entry::Dir(d)) => d,
                Some(Entry::File(_)) => {
                    return Err(Error::type_mismatch(path::display(full), "directory", "file"))
                }
                None => return Err(Error::NotFound(path::display(full))),
            };
        }
        Ok(dir)
    }

    fn walk_mut(&mut self, clean: &str, full: &str) -> Result<&mut Dir> {
        let mut dir = self;
        for segment in path::segments(clean) {
            dir = match dir.child_mut(segment) {
                Some(Entry::Dir(d)) => d,
                Some(Entry::File(_)) => {
                    return Err(Error::type_mismatch(path::display(full), "directory", "file"))
                }
                None => return Err(Error::NotFound(path::display(full))),
            };
        }
        dir.stale = true;
        Ok(dir)
    }
}

fn merge_child(dir: &mut Dir, incoming: Entry, clean: &str) -> Result<()> {
    let existing_is_dir = dir.child(incoming.name()).map(Entry::is_dir);
    match (existing_is_dir, incoming) {
        (None, incoming) | (Some(false), incoming @ Entry::File(_)) => {
            dir.insert(incoming);
            Ok(())
        }
        (Some(true), Entry::Dir(incoming)) => match dir.child_mut(incoming.name()) {
            Some(Entry::Dir(existing)) => merge_dirs(existing, incoming, clean),
            _ => Err(Error::NotFound(path::display(clean))),
        },
        (Some(true), Entry::File(_)) => Err(Error::type_mismatch(
            path::display(clean),
            "directory",
            "file",
        )),
        (Some(false), Entry::Dir(_)) => Err(Error::type_mismatch(
            path::display(clean),
            "file",
            "directory",
        )),
    }
}

fn merge_dirs(existing: &mut Dir, incoming: Dir, clean: &str) -> Result<()> {
    existing.stale = true;
    for child in incoming.entries {
        let child_path = join(clean, child.name());
        merge_child(existing, child, &child_path)?;
    }
    Ok(())
}
