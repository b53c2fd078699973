use std::path::Path;

use tracing::{debug, info};

use crate::archive;
use crate::config::Config;
use crate::error::Result;
use crate::tarfile::load_tarfile;
use crate::types::{Dir, Tarfile};

use super::apply;

/// run a build file against a context directory and return the finished
/// destination tree
///
/// the build file is loaded and validated before the context is scanned, so
/// a malformed file fails without touching the source tree. the ignore file
/// named in `config` prunes the source before any directive runs.
pub fn assemble(context: &Path, tarfile: &Path, config: &Config) -> Result<Dir> {
    let mut spec = load_tarfile(tarfile)?;
    spec.validate()?;
    debug!(tarfile = %tarfile.display(), commands = spec.len(), "loaded build file");

    let mut src = Dir::from_os(context)?;
    src.apply_ignore(&config.ignore_file)?;

    run_tarfile(&mut spec, &src)
}

/// build an archive from a context directory and build file
pub fn build(context: &Path, tarfile: &Path, config: &Config) -> Result<Vec<u8>> {
    let tree = assemble(context, tarfile, config)?;
    let data = archive::encode(&tree, config.compression, config.zstd_level)?;
    info!(
        entries = tree.deep_entries().len(),
        bytes = data.len(),
        compression = %config.compression,
        "archive built"
    );
    Ok(data)
}

/// validate and execute every command in order against a fresh tree
pub fn run_tarfile(spec: &mut Tarfile, src: &Dir) -> Result<Dir> {
    let directives = spec.validate()?;

    let mut dst = Dir::new();
    for (directive, cmd) in directives.into_iter().zip(&spec.commands) {
        apply(&mut dst, src, directive, &cmd.args)?;
    }
    Ok(dst)
}
