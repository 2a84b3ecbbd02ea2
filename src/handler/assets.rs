//! Static asset packaging
//!
//! Copies the development source folder into the serving folder so that the
//! served tree is populated before requests arrive.

use std::fs;
use std::io;
use std::path::Path;

/// Recursively copy `from` into `to`, overwriting existing files
///
/// A missing `from` copies nothing. Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    if !from.exists() {
        return Ok(0);
    }
    fs::create_dir_all(to)?;

    let mut copied = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let src = entry.path();
        let dest = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&src, &dest)?;
        } else {
            fs::copy(&src, &dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copies_nested_tree() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("js")).unwrap();
        fs::write(src.path().join("index.html"), "<html>").unwrap();
        fs::write(src.path().join("js/app.js"), "let a;").unwrap();

        let target = dst.path().join("static");
        let copied = copy_tree(src.path(), &target).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(target.join("index.html")).unwrap(), "<html>");
        assert_eq!(fs::read_to_string(target.join("js/app.js")).unwrap(), "let a;");
    }

    #[test]
    fn test_overwrites_existing() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), "new").unwrap();
        fs::write(dst.path().join("a.txt"), "old").unwrap();

        copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(fs::read_to_string(dst.path().join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_missing_source_is_noop() {
        let dst = TempDir::new().unwrap();
        let target = dst.path().join("out");
        assert_eq!(copy_tree(&dst.path().join("absent"), &target).unwrap(), 0);
        assert!(!target.exists());
    }
}
