//! Utilities (saving corrected code next to the original file).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const FIXED_SUFFIX: &str = "_fixed";

/// `dir/foo.py` -> `dir/foo_fixed.py`; files without an extension just get the suffix.
pub fn fixed_path(original: &Path) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match original.extension() {
        Some(ext) => format!("{}{}.{}", stem, FIXED_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, FIXED_SUFFIX),
    };
    original.with_file_name(name)
}

/// Write `code` to the fixed path, replacing any file already there.
pub fn save_fixed_file(original: &Path, code: &str) -> Result<PathBuf> {
    let path = fixed_path(original);
    fs::write(&path, code).with_context(|| format!("writing fixed file {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_path_names() {
        assert_eq!(fixed_path(Path::new("foo.py")), PathBuf::from("foo_fixed.py"));
        assert_eq!(fixed_path(Path::new("bar.cpp")), PathBuf::from("bar_fixed.cpp"));
        assert_eq!(fixed_path(Path::new("src/Main.java")), PathBuf::from("src/Main_fixed.java"));
        assert_eq!(fixed_path(Path::new("archive.tar.gz")), PathBuf::from("archive.tar_fixed.gz"));
        assert_eq!(fixed_path(Path::new("Makefile")), PathBuf::from("Makefile_fixed"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("foo.py");
        fs::write(dir.path().join("foo_fixed.py"), "old contents").unwrap();

        let saved = save_fixed_file(&original, "print(1)").unwrap();
        assert_eq!(saved, dir.path().join("foo_fixed.py"));
        assert_eq!(fs::read_to_string(&saved).unwrap(), "print(1)");
    }

    #[test]
    fn test_save_failure_propagates() {
        let err = save_fixed_file(Path::new("/nonexistent/dir/foo.py"), "x").unwrap_err();
        assert!(err.to_string().contains("foo_fixed.py"), "{err}");
    }
}
