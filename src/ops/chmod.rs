use crate::error::{Error, Result};
use crate::pattern::GlobSet;
use crate::types::{strip_recursive, Dir, Directive, ModeChange};

/// change permission bits of every destination entry matching a glob
pub fn chmod(dst: &mut Dir, _src: &Dir, args: &[String]) -> Result<()> {
    let usage = || Error::Usage(Directive::Chmod.usage().to_string());

    let (recursive, args) = strip_recursive(args);
    let (mode, globs) = args.split_first().ok_or_else(usage)?;
    let change: ModeChange = mode.parse().map_err(|_| usage())?;
    if globs.is_empty() {
        return Err(usage());
    }

    let globs = GlobSet::new(globs)?;
    for path in matching(dst, &globs) {
        dst.get_entry_mut(&path)?
            .chmod(change.mask, change.mode, recursive);
    }

    dst.bake_deep_entries();
    Ok(())
}

/// destination deep entries matched by any glob
pub(crate) fn matching(dst: &Dir, globs: &GlobSet) -> Vec<String> {
    dst.deep_entries()
        .iter()
        .filter(|path| globs.is_match(path))
        .cloned()
        .collect()
}
