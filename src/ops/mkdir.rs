use crate::error::{Error, Result};
use crate::types::{Dir, Directive};

/// create every listed directory along with its missing parents
pub fn mkdir(dst: &mut Dir, _src: &Dir, args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err(Error::Usage(Directive::Mkdir.usage().to_string()));
    }

    for path in args {
        dst.mkdir_all(path)?;
    }

    dst.bake_deep_entries();
    Ok(())
}
