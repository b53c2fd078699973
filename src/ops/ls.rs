use std::fmt;

use crate::error::Result;
use crate::types::Dir;

/// one listed tree entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsEntry {
    pub path: String,
    pub kind: &'static str,
    pub perm: u32,
    pub user: String,
    pub group: String,
}

impl fmt::Display for LsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slash = if self.kind == "directory" { "/" } else { "" };
        write!(
            f,
            "{:04o} {}:{} {}{}",
            self.perm, self.user, self.group, self.path, slash
        )
    }
}

/// list every descendant of `root` in deep-entry order
pub fn ls(root: &Dir) -> Result<Vec<LsEntry>> {
    root.deep_entries()
        .iter()
        .map(|path| {
            let entry = root.get_entry(path)?;
            Ok(LsEntry {
                path: path.clone(),
                kind: entry.type_name(),
                perm: entry.perm(),
                user: entry.user().to_string(),
                group: entry.group().to_string(),
            })
        })
        .collect()
}
