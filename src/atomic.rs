// 💾 Atomic file replacement
// Write into a temp file next to the destination, then rename over it.
// A failed write never leaves a partial file at the destination.
// Replacing keeps the old file's permissions; new files get the usual
// 0666 minus umask instead of the temp file's private 0600.

use crate::error::{CommitteeError, CommitteeResult};
use std::fs::{self, File, Permissions};
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

pub fn write_atomically<F>(path: &Path, write: F) -> CommitteeResult<()>
where
    F: FnOnce(&mut File) -> CommitteeResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = Builder::new();
    if existing.is_none() {
        if let Some(perms) = new_file_permissions() {
            builder.permissions(perms);
        }
    }
    let mut tmp = builder.tempfile_in(dir).map_err(|e| CommitteeError::io(dir, e))?;

    if let Some(perms) = existing {
        tmp.as_file()
            .set_permissions(perms)
            .map_err(|e| CommitteeError::io(path, e))?;
    }

    write(tmp.as_file_mut())?;
    tmp.as_file_mut()
        .flush()
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CommitteeError::io(path, e))?;

    tmp.persist(path)
        .map_err(|e| CommitteeError::io(path, e.error))?;

    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();

        write_atomically(&path, |f| {
            f.write_all(b"new").map_err(|e| CommitteeError::io("out.txt", e))
        })
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();

        let result = write_atomically(&path, |f| {
            f.write_all(b"partial").map_err(|e| CommitteeError::io("out.txt", e))?;
            Err(CommitteeError::render("layout failed"))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
        // temp file is cleaned up on drop
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let err = write_atomically(&path, |_| Ok(())).unwrap_err();
        assert!(matches!(err, CommitteeError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_replacing_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.json");
        std::fs::write(&path, "[]").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o644)).unwrap();

        write_atomically(&path, |f| {
            f.write_all(b"[ ]").map_err(|e| CommitteeError::io("members.json", e))
        })
        .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode_matches_plain_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.csv");
        let path = dir.path().join("attendance.csv");
        std::fs::write(&plain, "x").unwrap();

        write_atomically(&path, |f| {
            f.write_all(b"x").map_err(|e| CommitteeError::io("attendance.csv", e))
        })
        .unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }
}
