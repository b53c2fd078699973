use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// path sentinel meaning standard input or standard output
pub const STDIO: &str = "-";

/// is this path the stdio sentinel
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

/// read a whole file, or standard input for `-`
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if is_stdio(path) {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data).with_path("<stdin>")?;
        return Ok(data);
    }
    fs::read(path).with_path(path)
}

/// write bytes to a file, or standard output for `-`
///
/// files are replaced atomically: temp -> fsync -> rename -> fsync parent
pub fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data).with_path("<stdout>")?;
        stdout.flush().with_path("<stdout>")?;
        return Ok(());
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let written = write_synced(&tmp_path, data).and_then(|()| fs::rename(&tmp_path, path).with_path(path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    let dir = File::open(parent).with_path(parent)?;
    dir.sync_all().with_path(parent)?;

    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path).with_path(path)?;
    file.write_all(data).with_path(path)?;
    file.sync_all().with_path(path)?;
    Ok(())
}
