use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::pattern::GlobSet;
use crate::types::{Dir, Directive};
use crate::vfs::join;

/// copy source entries matching any glob into the destination tree
///
/// the last argument is the destination. a destination ending in `/` is a
/// directory that receives each match under its own name; otherwise the
/// single match is stored under the destination path itself. several
/// matches always imply a directory destination.
pub fn copy(dst: &mut Dir, src: &Dir, args: &[String]) -> Result<()> {
    let Some((dest, globs)) = args.split_last() else {
        return Err(Error::Usage(Directive::Copy.usage().to_string()));
    };
    if globs.is_empty() {
        return Err(Error::Usage(Directive::Copy.usage().to_string()));
    }

    let globs = GlobSet::new(globs)?;
    let matched: Vec<String> = src
        .deep_entries()
        .iter()
        .filter(|path| globs.is_match(path))
        .cloned()
        .collect();

    if matched.is_empty() {
        warn!(dest = %dest, "COPY matched no source entries");
        return Ok(());
    }

    let mut dest = dest.clone();
    if matched.len() > 1 && !dest.ends_with('/') {
        dest.push('/');
    }

    for path in &matched {
        let entry = src.get_entry(path)?;
        let target = if dest.ends_with('/') {
            join(&dest, entry.name())
        } else {
            dest.clone()
        };
        trace!(from = %path, to = %target, "copy");
        dst.add(&target, entry)?;
    }

    dst.bake_deep_entries();
    Ok(())
}
