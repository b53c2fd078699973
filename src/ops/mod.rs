//! directive executors and the build driver

mod build;
mod chmod;
mod chown;
mod copy;
mod ls;
mod mkdir;

use tracing::debug;

use crate::error::Result;
use crate::types::{Dir, Directive};

pub use build::{assemble, build, run_tarfile};
pub use chmod::chmod;
pub use chown::chown;
pub use copy::copy;
pub use ls::{ls, LsEntry};
pub use mkdir::mkdir;

/// run one directive against the destination tree
pub fn apply(dst: &mut Dir, src: &Dir, directive: Directive, args: &[String]) -> Result<()> {
    debug!(directive = %directive, args = ?args, "apply");
    match directive {
        Directive::Mkdir => mkdir(dst, src, args),
        Directive::Copy => copy(dst, src, args),
        Directive::Chmod => chmod(dst, src, args),
        Directive::Chown => chown(dst, src, args),
    }
}
