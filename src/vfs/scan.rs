use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::types::Dir;

impl Dir {
    /// build a tree mirroring a directory on disk
    ///
    /// directories and regular files keep their on-disk permission bits;
    /// symlinks and special files are skipped. file contents are not read,
    /// each file records its absolute origin path instead.
    pub fn from_os(root: &Path) -> Result<Dir> {
        let root = std::path::absolute(root).with_path(root)?;
        let meta = fs::metadata(&root).with_path(&root)?;
        if !meta.is_dir() {
            return Err(Error::type_mismatch(
                root.display().to_string(),
                "directory",
                "file",
            ));
        }

        let mut tree = Dir::new();
        let (mut dirs, mut files) = (0usize, 0usize);

        for entry in WalkDir::new(&root).sort_by_file_name().min_depth(1) {
            let entry = entry?;
            let Ok(rel) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let rel = rel.to_string_lossy();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                let perm = entry.metadata()?.permissions().mode() & 0o777;
                tree.mkdir_all(&rel)?.perm = perm;
                dirs += 1;
            } else if file_type.is_file() {
                let perm = entry.metadata()?.permissions().mode() & 0o777;
                tree.add_file(&rel, entry.path())?.perm = perm;
                files += 1;
            } else {
                trace!(path = %rel, "skipping non-regular entry");
            }
        }

        tree.bake_deep_entries();
        debug!(root = %root.display(), dirs, files, "scanned source tree");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entry;
    use tempfile::tempdir;

    #[test]
    fn test_from_os_mirrors_tree() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("etc/ssh")).unwrap();
        fs::write(dir.path().join("etc/hosts"), "127.0.0.1 localhost\n").unwrap();
        fs::write(dir.path().join("etc/ssh/sshd_config"), "Port 22\n").unwrap();
        fs::write(dir.path().join("README"), "hi").unwrap();

        let tree = Dir::from_os(dir.path()).unwrap();
        assert_eq!(
            tree.deep_entries().as_ref(),
            ["README", "etc", "etc/hosts", "etc/ssh", "etc/ssh/sshd_config"]
        );

        let hosts = tree.get_file("etc/hosts").unwrap();
        assert!(hosts.origin.is_absolute());
        assert_eq!(tree.read_file("etc/hosts").unwrap(), b"127.0.0.1 localhost\n");
    }

    #[test]
    fn test_from_os_keeps_permissions() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("bin")).unwrap();
        fs::set_permissions(dir.path().join("bin"), fs::Permissions::from_mode(0o700)).unwrap();
        fs::write(dir.path().join("tool"), "#!/bin/sh\n").unwrap();
        fs::set_permissions(dir.path().join("tool"), fs::Permissions::from_mode(0o751)).unwrap();

        let tree = Dir::from_os(dir.path()).unwrap();
        assert_eq!(tree.get_dir("bin").unwrap().perm, 0o700);
        assert_eq!(tree.get_file("tool").unwrap().perm, 0o751);
        // the root keeps its defaults
        assert_eq!(tree.perm, 0o755);
        assert_eq!(tree.user, "root");
    }

    #[test]
    fn test_from_os_skips_symlinks() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real"), "r").unwrap();
        std::os::unix::fs::symlink("real", dir.path().join("link")).unwrap();

        let tree = Dir::from_os(dir.path()).unwrap();
        assert_eq!(tree.deep_entries().as_ref(), ["real"]);
        assert!(matches!(tree.child("real"), Some(Entry::File(_))));
    }

    #[test]
    fn test_from_os_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            Dir::from_os(&file),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            Dir::from_os(&dir.path().join("missing")),
            Err(Error::Io { .. })
        ));
    }
}
