//! Copying libraries into the bundle directory.

use anyhow::{Context, Result};
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

/// Copy a file, keeping its permissions and access/modification times.
pub fn copy_preserving_metadata(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).with_context(|| {
        format!("Failed to copy {} to {}", src.display(), dst.display())
    })?;

    let meta = fs::metadata(src)
        .with_context(|| format!("Failed to read metadata: {}", src.display()))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }

    // futimens only needs ownership, so read-only copies can still be stamped
    File::open(dst)
        .and_then(|f| f.set_times(times))
        .with_context(|| format!("Failed to set file times: {}", dst.display()))?;
    Ok(())
}

/// Copy `src` into `dest_dir` under its own file name.
///
/// Returns `Ok(Some(dest))` if the file was copied, `Ok(None)` if a file with
/// that name was already in `dest_dir`. Existing files are never overwritten.
pub fn copy_into(src: &Path, dest_dir: &Path) -> Result<Option<PathBuf>> {
    let dest = bundle_destination(src, dest_dir)?;
    if dest.exists() || dest.is_symlink() {
        return Ok(None); // Already copied
    }
    copy_preserving_metadata(src, &dest)?;
    Ok(Some(dest))
}

/// Path `src` would occupy inside `dest_dir`.
pub fn bundle_destination(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .with_context(|| format!("Library path has no file name: {}", src.display()))?;
    Ok(dest_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_copy_into_copies_once() {
        let temp = TempDir::new().unwrap();
        let src_dir = temp.path().join("bin");
        let out = temp.path().join("out");
        fs::create_dir_all(&src_dir).unwrap();
        fs::create_dir_all(&out).unwrap();
        let src = src_dir.join("zlib1.dll");
        fs::write(&src, b"first").unwrap();

        let dest = copy_into(&src, &out).unwrap();
        assert_eq!(dest, Some(out.join("zlib1.dll")));

        // A second copy must leave the existing file alone
        fs::write(&src, b"second").unwrap();
        assert_eq!(copy_into(&src, &out).unwrap(), None);
        assert_eq!(fs::read(out.join("zlib1.dll")).unwrap(), b"first");
    }

    #[test]
    fn test_copy_preserves_mtime_and_mode() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("libfoo.dll");
        let dst = temp.path().join("copy.dll");
        fs::write(&src, b"MZ").unwrap();

        let mut perms = fs::metadata(&src).unwrap().permissions();
        perms.set_mode(0o750);
        fs::set_permissions(&src, perms).unwrap();

        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(old)
            .unwrap();

        copy_preserving_metadata(&src, &dst).unwrap();

        let meta = fs::metadata(&dst).unwrap();
        assert_eq!(meta.modified().unwrap(), old);
        assert_eq!(meta.permissions().mode() & 0o777, 0o750);
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let result = copy_into(&temp.path().join("gone.dll"), temp.path());
        assert!(result.is_err());
    }
}
