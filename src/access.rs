//! Filesystem readability probe
//!
//! Table construction is gated on the parent of the storage location being
//! readable, and the catalog decides existence by probing the resolved
//! path. Both checks go through this module.

use std::fs;
use std::path::Path;

/// Returns true if `path` exists and can be opened for reading.
///
/// Directories are probed with `read_dir`, everything else by opening the
/// file. A probe failure for any reason (missing, permission denied) reads
/// as not readable.
pub fn readable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => fs::read_dir(path).is_ok(),
        Ok(_) => fs::File::open(path).is_ok(),
        Err(_) => false,
    }
}

/// Returns true if the parent directory of `path` is readable.
///
/// A path with no parent component (a bare filename) is resolved against
/// the current directory; a root path has no parent to check and passes.
pub fn parent_readable(path: &Path) -> bool {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => readable(Path::new(".")),
        Some(parent) => readable(parent),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_readable_existing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(readable(temp_dir.path()));
    }

    #[test]
    fn test_readable_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("probe.txt");
        fs::write(&file, b"x").unwrap();
        assert!(readable(&file));
    }

    #[test]
    fn test_readable_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!readable(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_parent_readable() {
        let temp_dir = TempDir::new().unwrap();
        // Parent exists, the file itself does not have to.
        assert!(parent_readable(&temp_dir.path().join("new.tbl")));
        assert!(!parent_readable(
            &temp_dir.path().join("missing").join("new.tbl")
        ));
    }

    #[test]
    fn test_parent_readable_bare_filename() {
        assert!(parent_readable(Path::new("bare.tbl")));
    }
}
