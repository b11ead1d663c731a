//! Atomic file write helpers.
//!
//! Uses a temp file + rename pattern. On Windows, rename-over-existing fails, so we
//! use a backup-and-restore fallback to avoid losing the previous snapshot.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Recover from incomplete atomic writes by restoring `.bak` files.
///
/// If `path` does not exist but `path.bak` does, a crash occurred during the
/// backup-rename window in [`atomic_write`]. Rename the backup
/// back to the canonical path so the caller can proceed.
pub fn recover_bak_file(path: &Path) {
    let backup = path.with_extension("bak");
    if !path.exists() && backup.exists() {
        match fs::rename(&backup, path) {
            Ok(()) => {
                tracing::warn!(
                    path = %path.display(),
                    "Recovered .bak file from interrupted atomic write"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to recover .bak file: {e}"
                );
            }
        }
    }
}

/// Write `bytes` to `path` through a synced temp file and rename.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_or_cwd(path);

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    // Persist (rename) - handle Windows where rename fails if target exists.
    if let Err(err) = tmp.persist(path) {
        if path.exists() {
            let backup_path = path.with_extension("bak");
            let _ = fs::remove_file(&backup_path);
            fs::rename(path, &backup_path)?;

            if let Err(rename_err) = err.file.persist(path) {
                let _ = fs::rename(&backup_path, path);
                return Err(rename_err.error);
            }
            if let Err(e) = fs::remove_file(&backup_path) {
                tracing::warn!(
                    path = %backup_path.display(),
                    "Failed to remove .bak after atomic write: {e}"
                );
            }
        } else {
            return Err(err.error);
        }
    }

    best_effort_sync_parent_dir(parent);

    Ok(())
}

/// Remove `path` and any `.bak` left beside it by an interrupted write.
///
/// Missing files are not an error. The backup goes first so a later
/// [`recover_bak_file`] cannot resurrect removed content.
pub fn remove_with_backup(path: &Path) -> io::Result<()> {
    for target in [path.with_extension("bak"), path.to_path_buf()] {
        match fs::remove_file(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn best_effort_sync_parent_dir(parent: &Path) {
    #[cfg(unix)]
    {
        if let Err(e) = fs::File::open(parent).and_then(|d| d.sync_all()) {
            tracing::debug!(path = %parent.display(), "Parent directory sync_all failed (best-effort): {e}");
        }
    }

    #[cfg(not(unix))]
    {
        tracing::debug!(path = %parent.display(), "Parent directory sync skipped on this platform");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{atomic_write, recover_bak_file, remove_with_backup};

    #[test]
    fn atomic_write_overwrites_existing_and_cleans_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");

        atomic_write(&path, b"one").expect("write one");
        atomic_write(&path, b"two").expect("write two");

        let content = fs::read_to_string(&path).expect("read");
        assert_eq!(content, "two");
        assert!(!path.with_extension("bak").exists());
    }

    #[test]
    fn recover_bak_restores_missing_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        fs::write(path.with_extension("bak"), b"saved").expect("write bak");

        recover_bak_file(&path);

        assert_eq!(fs::read_to_string(&path).expect("read"), "saved");
        assert!(!path.with_extension("bak").exists());
    }

    #[test]
    fn recover_bak_leaves_existing_target_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        fs::write(&path, b"current").expect("write target");
        fs::write(path.with_extension("bak"), b"stale").expect("write bak");

        recover_bak_file(&path);

        assert_eq!(fs::read_to_string(&path).expect("read"), "current");
    }

    #[test]
    fn remove_with_backup_clears_both_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        fs::write(&path, b"current").expect("write target");
        fs::write(path.with_extension("bak"), b"stale").expect("write bak");

        remove_with_backup(&path).expect("remove");
        recover_bak_file(&path);

        assert!(!path.exists());
        assert!(!path.with_extension("bak").exists());
    }

    #[test]
    fn remove_with_backup_tolerates_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        remove_with_backup(&dir.path().join("absent.json")).expect("remove");
    }
}
