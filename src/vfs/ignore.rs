use std::fs;

use tracing::debug;

use crate::error::{IoResultExt, Result};
use crate::pattern::IgnoreRules;
use crate::types::{Dir, Entry};

impl Dir {
    /// prune entries named by ignore files found in the tree
    ///
    /// a directory's ignore file is matched against that directory's deep
    /// entries; an ignored directory goes with everything below it. the
    /// remaining subdirectories are then visited the same way. a directory
    /// without an ignore file ends the walk along that branch.
    pub fn apply_ignore(&mut self, ignore_file: &str) -> Result<()> {
        self.apply_ignore_rules(ignore_file)?;
        self.bake_deep_entries();
        Ok(())
    }

    fn apply_ignore_rules(&mut self, ignore_file: &str) -> Result<()> {
        let origin = match self.child(ignore_file) {
            Some(Entry::File(file)) => file.origin.clone(),
            _ => return Ok(()),
        };

        let data = fs::read(&origin).with_path(&origin)?;
        let rules = IgnoreRules::from_bytes(&data)?;

        if !rules.is_empty() {
            for path in self.deep_entries().into_owned() {
                let is_dir = match self.get_entry(&path) {
                    Ok(entry) => entry.is_dir(),
                    // under an already removed directory
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e),
                };
                if rules.is_ignored(&path, is_dir) {
                    self.remove(&path)?;
                    debug!(dir = %self.name(), path = %path, "ignored");
                }
            }
        }

        self.stale = true;
        for entry in &mut self.entries {
            if let Entry::Dir(d) = entry {
                d.apply_ignore_rules(ignore_file)?;
            }
        }
        Ok(())
    }
}
