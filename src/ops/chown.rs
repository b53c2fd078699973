use crate::error::{Error, Result};
use crate::pattern::GlobSet;
use crate::types::{strip_recursive, Dir, Directive};

use super::chmod::matching;

/// change owner and group of every destination entry matching a glob
///
/// the owner argument is `user`, `user:group` or `:group`; an empty side
/// leaves that field as it is.
pub fn chown(dst: &mut Dir, _src: &Dir, args: &[String]) -> Result<()> {
    let usage = || Error::Usage(Directive::Chown.usage().to_string());

    let (recursive, args) = strip_recursive(args);
    let (owner, globs) = args.split_first().ok_or_else(usage)?;
    if globs.is_empty() {
        return Err(usage());
    }
    let (user, group) = owner.split_once(':').unwrap_or((owner.as_str(), ""));

    let globs = GlobSet::new(globs)?;
    for path in matching(dst, &globs) {
        dst.get_entry_mut(&path)?.chown(user, group, recursive);
    }

    dst.bake_deep_entries();
    Ok(())
}
