use std::path::PathBuf;

/// permission bits of a newly created directory
pub const DEFAULT_DIR_PERM: u32 = 0o755;

/// permission bits of a newly added file
pub const DEFAULT_FILE_PERM: u32 = 0o644;

/// owner and group given to new entries
pub const DEFAULT_OWNER: &str = "root";

/// directory type bit merged into the archived mode
pub const S_IFDIR: u32 = 0o040000;

/// regular file type bit merged into the archived mode
pub const S_IFREG: u32 = 0o100000;

/// a node in a virtual filesystem tree
#[derive(Clone, Debug)]
pub enum Entry {
    Dir(Dir),
    File(File),
}

/// a directory: attributes plus children sorted by name
#[derive(Clone, Debug)]
pub struct Dir {
    name: String,
    pub perm: u32,
    pub user: String,
    pub group: String,
    pub(crate) entries: Vec<Entry>,
    pub(crate) deep_entries: Vec<String>,
    pub(crate) stale: bool,
}

/// a regular file; content stays at `origin` until it is archived
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    name: String,
    pub perm: u32,
    pub user: String,
    pub group: String,
    pub origin: PathBuf,
}

impl Dir {
    /// create an empty root directory
    pub fn new() -> Self {
        Self::named("/")
    }

    /// create an empty directory with default attributes
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            perm: DEFAULT_DIR_PERM,
            user: DEFAULT_OWNER.to_string(),
            group: DEFAULT_OWNER.to_string(),
            entries: vec![],
            deep_entries: vec![],
            stale: false,
        }
    }

    /// single path segment naming this directory; `/` for a root
    pub fn name(&self) -> &str {
        &self.name
    }

    /// children in ascending name order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// number of direct children
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// has no children
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// look up a direct child by name
    pub fn child(&self, name: &str) -> Option<&Entry> {
        self.position(name).ok().map(|i| &self.entries[i])
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.stale = true;
        match self.position(name) {
            Ok(i) => Some(&mut self.entries[i]),
            Err(_) => None,
        }
    }

    /// insert a child, replacing any child with the same name
    pub(crate) fn insert(&mut self, entry: Entry) -> &mut Entry {
        self.stale = true;
        let idx = match self.position(entry.name()) {
            Ok(i) => {
                self.entries[i] = entry;
                i
            }
            Err(i) => {
                self.entries.insert(i, entry);
                i
            }
        };
        &mut self.entries[idx]
    }

    /// detach a direct child
    pub(crate) fn take(&mut self, name: &str) -> Option<Entry> {
        let idx = self.position(name).ok()?;
        self.stale = true;
        Some(self.entries.remove(idx))
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|e| e.name().as_bytes().cmp(name.as_bytes()))
    }
}

impl Default for Dir {
    fn default() -> Self {
        Self::new()
    }
}

impl File {
    /// create a file bound to its original content location
    pub fn new(name: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            perm: DEFAULT_FILE_PERM,
            user: DEFAULT_OWNER.to_string(),
            group: DEFAULT_OWNER.to_string(),
            origin: origin.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entry {
    /// single path segment naming this entry
    pub fn name(&self) -> &str {
        match self {
            Entry::Dir(d) => &d.name,
            Entry::File(f) => &f.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Entry::Dir(d) => d.name = name.into(),
            Entry::File(f) => f.name = name.into(),
        }
    }

    /// get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::Dir(_) => "directory",
            Entry::File(_) => "file",
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    pub fn perm(&self) -> u32 {
        match self {
            Entry::Dir(d) => d.perm,
            Entry::File(f) => f.perm,
        }
    }

    pub fn user(&self) -> &str {
        match self {
            Entry::Dir(d) => &d.user,
            Entry::File(f) => &f.user,
        }
    }

    pub fn group(&self) -> &str {
        match self {
            Entry::Dir(d) => &d.group,
            Entry::File(f) => &f.group,
        }
    }

    /// permission bits with the file type bit merged in
    pub fn archive_mode(&self) -> u32 {
        match self {
            Entry::Dir(d) => d.perm | S_IFDIR,
            Entry::File(f) => f.perm | S_IFREG,
        }
    }

    pub fn as_dir(&self) -> Option<&Dir> {
        match self {
            Entry::Dir(d) => Some(d),
            Entry::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Entry::File(f) => Some(f),
            Entry::Dir(_) => None,
        }
    }

    pub fn as_dir_mut(&mut self) -> Option<&mut Dir> {
        match self {
            Entry::Dir(d) => Some(d),
            Entry::File(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        match self {
            Entry::File(f) => Some(f),
            Entry::Dir(_) => None,
        }
    }

    /// replace the permission bits selected by `mask` with those of `mode`
    pub fn chmod(&mut self, mask: u32, mode: u32, recursive: bool) {
        match self {
            Entry::Dir(d) => d.chmod(mask, mode, recursive),
            Entry::File(f) => f.chmod(mask, mode),
        }
    }

    /// set owner and group; an empty value leaves that field unchanged
    pub fn chown(&mut self, user: &str, group: &str, recursive: bool) {
        match self {
            Entry::Dir(d) => d.chown(user, group, recursive),
            Entry::File(f) => f.chown(user, group),
        }
    }
}

impl Dir {
    pub fn chmod(&mut self, mask: u32, mode: u32, recursive: bool) {
        self.perm = masked(self.perm, mask, mode);
        if recursive {
            for e in &mut self.entries {
                e.chmod(mask, mode, recursive);
            }
        }
    }

    pub fn chown(&mut self, user: &str, group: &str, recursive: bool) {
        set_owner(&mut self.user, &mut self.group, user, group);
        if recursive {
            for e in &mut self.entries {
                e.chown(user, group, recursive);
            }
        }
    }
}

impl File {
    pub fn chmod(&mut self, mask: u32, mode: u32) {
        self.perm = masked(self.perm, mask, mode);
    }

    pub fn chown(&mut self, user: &str, group: &str) {
        set_owner(&mut self.user, &mut self.group, user, group);
    }
}

fn masked(perm: u32, mask: u32, mode: u32) -> u32 {
    (mask & mode) | (perm & !mask)
}

fn set_owner(cur_user: &mut String, cur_group: &mut String, user: &str, group: &str) {
    if !user.is_empty() {
        *cur_user = user.to_string();
    }
    if !group.is_empty() {
        *cur_group = group.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Entry {
        Entry::File(File::new(name, format!("/src/{}", name)))
    }

    #[test]
    fn test_dir_defaults() {
        let d = Dir::new();
        assert_eq!(d.perm, 0o755);
        assert_eq!(d.user, "root");
        assert_eq!(d.group, "root");
        assert!(d.is_empty());
    }

    #[test]
    fn test_file_defaults() {
        let f = File::new("a.txt", "/src/a.txt");
        assert_eq!(f.perm, 0o644);
        assert_eq!(f.user, "root");
        assert_eq!(f.group, "root");
        assert_eq!(f.origin, PathBuf::from("/src/a.txt"));
    }

    #[test]
    fn test_insert_keeps_sorted() {
        let mut d = Dir::new();
        d.insert(file("zebra"));
        d.insert(file("alpha"));
        d.insert(Entry::Dir(Dir::named("beta")));
        let names: Vec<_> = d.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alpha", "beta", "zebra"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut d = Dir::new();
        d.insert(file("a"));
        d.insert(Entry::Dir(Dir::named("a")));
        assert_eq!(d.len(), 1);
        assert!(d.child("a").unwrap().is_dir());
    }

    #[test]
    fn test_take() {
        let mut d = Dir::new();
        d.insert(file("a"));
        d.insert(file("b"));
        assert_eq!(d.take("a").unwrap().name(), "a");
        assert!(d.take("a").is_none());
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_name_accessors() {
        let mut d = Dir::named("etc");
        d.insert(file("hosts"));
        assert_eq!(d.name(), "etc");
        assert_eq!(Dir::new().name(), "/");
        assert_eq!(d.child("hosts").unwrap().as_file().unwrap().name(), "hosts");
    }

    #[test]
    fn test_archive_mode() {
        assert_eq!(Entry::Dir(Dir::new()).archive_mode(), 0o40755);
        assert_eq!(file("f").archive_mode(), 0o100644);
    }

    #[test]
    fn test_chmod_mask() {
        let mut e = file("f");
        e.chmod(0o222, 0, false);
        assert_eq!(e.perm(), 0o444);
        e.chmod(0xFFFF_FFFF, 0o755, false);
        assert_eq!(e.perm(), 0o755);
    }

    #[test]
    fn test_chmod_recursive() {
        let mut sub = Dir::named("sub");
        sub.insert(file("inner"));
        let mut root = Dir::named("d");
        root.insert(Entry::Dir(sub));
        root.insert(file("f"));
        let mut e = Entry::Dir(root);

        e.chmod(0xFFFF_FFFF, 0o700, true);
        let d = e.as_dir().unwrap();
        assert_eq!(d.perm, 0o700);
        assert_eq!(d.child("f").unwrap().perm(), 0o700);
        let sub = d.child("sub").unwrap().as_dir().unwrap();
        assert_eq!(sub.perm, 0o700);
        assert_eq!(sub.child("inner").unwrap().perm(), 0o700);
    }

    #[test]
    fn test_chmod_non_recursive_leaves_children() {
        let mut d = Dir::named("d");
        d.insert(file("f"));
        let mut e = Entry::Dir(d);
        e.chmod(0xFFFF_FFFF, 0o700, false);
        assert_eq!(e.perm(), 0o700);
        assert_eq!(e.as_dir().unwrap().child("f").unwrap().perm(), 0o644);
    }

    #[test]
    fn test_chown_partial() {
        let mut e = file("f");
        e.chown("app", "", false);
        assert_eq!(e.user(), "app");
        assert_eq!(e.group(), "root");
        e.chown("", "staff", false);
        assert_eq!(e.user(), "app");
        assert_eq!(e.group(), "staff");
    }

    #[test]
    fn test_chown_recursive() {
        let mut d = Dir::named("d");
        d.insert(file("f"));
        let mut e = Entry::Dir(d);
        e.chown("nobody", "nogroup", true);
        let child = e.as_dir().unwrap().child("f").unwrap();
        assert_eq!(child.user(), "nobody");
        assert_eq!(child.group(), "nogroup");
    }

    #[test]
    fn test_entry_type_names() {
        assert_eq!(file("f").type_name(), "file");
        assert_eq!(Entry::Dir(Dir::new()).type_name(), "directory");
        assert!(file("f").is_file());
        assert!(!file("f").is_dir());
    }
}
