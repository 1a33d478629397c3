//! Library lookup in the toolchain's DLL directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Find a library in `search_path`, matching the file name case-insensitively.
///
/// Import tables often disagree with the on-disk casing (`KERNEL32.dll` vs
/// `kernel32.dll`), so lookup tries, in order:
/// 1. the name exactly as declared
/// 2. the lowercased name
/// 3. a scan of the directory for any entry equal ignoring case
///
/// The scan is only reached when both cheap checks miss.
///
/// Returns `None` if nothing matches. A directory that cannot be listed is
/// treated the same as a miss.
#[must_use = "found library path should be used"]
pub fn find_library(search_path: &Path, lib_name: &str) -> Option<PathBuf> {
    let exact = search_path.join(lib_name);
    if present(&exact) {
        return Some(exact);
    }

    let lower_name = lib_name.to_lowercase();
    let lower = search_path.join(&lower_name);
    if present(&lower) {
        return Some(lower);
    }

    scan_case_insensitive(search_path, &lower_name)
}

// Follows symlinks: a dangling link is not a usable library
fn present(path: &Path) -> bool {
    path.exists()
}

fn scan_case_insensitive(search_path: &Path, lower_name: &str) -> Option<PathBuf> {
    let entries = match fs::read_dir(search_path) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot list {}: {}", search_path.display(), e);
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().to_lowercase() == lower_name)
        .map(|entry| entry.path())
        .find(|path| present(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"MZ").unwrap();
        path
    }

    #[test]
    fn test_find_exact() {
        let temp = TempDir::new().unwrap();
        let path = touch(temp.path(), "libpng16-16.dll");

        assert_eq!(find_library(temp.path(), "libpng16-16.dll"), Some(path));
    }

    #[test]
    fn test_find_lowercase() {
        let temp = TempDir::new().unwrap();
        let path = touch(temp.path(), "zlib1.dll");

        assert_eq!(find_library(temp.path(), "ZLIB1.DLL"), Some(path));
    }

    #[test]
    fn test_find_mixed_case_by_scan() {
        let temp = TempDir::new().unwrap();
        let path = touch(temp.path(), "LibIntl-8.dll");

        assert_eq!(find_library(temp.path(), "LIBINTL-8.dll"), Some(path));
    }

    #[test]
    fn test_exact_preferred_over_lowercase() {
        let temp = TempDir::new().unwrap();
        let exact = touch(temp.path(), "Foo.dll");
        touch(temp.path(), "foo.dll");

        assert_eq!(find_library(temp.path(), "Foo.dll"), Some(exact));
    }

    #[test]
    fn test_not_found() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "other.dll");

        assert!(find_library(temp.path(), "missing.dll").is_none());
    }

    #[test]
    fn test_dangling_symlink_is_miss() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.dll"), temp.path().join("libz.dll"))
            .unwrap();

        assert!(find_library(temp.path(), "libz.dll").is_none());
        assert!(find_library(temp.path(), "LIBZ.DLL").is_none());
    }

    #[test]
    fn test_symlink_to_library_is_hit() {
        let temp = TempDir::new().unwrap();
        let target = touch(temp.path(), "libz-1.2.dll");
        let link = temp.path().join("libz.dll");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(find_library(temp.path(), "libz.dll"), Some(link));
    }

    #[test]
    fn test_unreadable_directory_is_miss() {
        let temp = TempDir::new().unwrap();
        let missing_dir = temp.path().join("no-such-dir");

        assert!(find_library(&missing_dir, "Foo.DLL").is_none());
    }
}
