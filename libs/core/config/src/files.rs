//! Filesystem checks used by validation and service-definition discovery.

use crate::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// True when `path` exists and is not a directory.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

pub fn dir_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

pub fn has_extension(path: impl AsRef<Path>, extension: &str) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext == extension)
}

/// Collects the files carrying `extension` from `dirs` (non-recursive, sorted)
/// followed by the explicitly listed `files`.
pub fn files_with_extension(
    extension: &str,
    files: &[String],
    dirs: &[String],
) -> Result<Vec<PathBuf>, ConfigError> {
    let mut found = Vec::new();
    for dir in dirs {
        if !dir_exists(dir) {
            return Err(ConfigError::NotFound {
                what: "directory",
                path: PathBuf::from(dir),
            });
        }
        let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
            path: PathBuf::from(dir),
            source,
        })?;
        let mut in_dir = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ConfigError::Io {
                path: PathBuf::from(dir),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() && has_extension(&path, extension) {
                in_dir.push(path);
            }
        }
        in_dir.sort();
        found.extend(in_dir);
    }
    for file in files {
        if !file_exists(file) {
            return Err(ConfigError::NotFound {
                what: "file",
                path: PathBuf::from(file),
            });
        }
        if !has_extension(file, extension) {
            return Err(ConfigError::invalid(
                "file",
                file.as_str(),
                format!("without extension '{extension}'"),
            ));
        }
        found.push(clean(Path::new(file)));
    }
    Ok(found)
}

fn clean(path: &Path) -> PathBuf {
    path.components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_exists_predicates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.json");
        File::create(&file).unwrap();

        assert!(file_exists(&file));
        assert!(!file_exists(dir.path()));
        assert!(dir_exists(dir.path()));
        assert!(!dir_exists(&file));
        assert!(!file_exists(dir.path().join("missing")));
    }

    #[test]
    fn test_files_with_extension_collects_dirs_then_files() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.json")).unwrap();
        File::create(dir.path().join("a.json")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let other = tempfile::tempdir().unwrap();
        let explicit = other.path().join("extra.json");
        File::create(&explicit).unwrap();

        let found = files_with_extension(
            "json",
            &[explicit.display().to_string()],
            &[dir.path().display().to_string()],
        )
        .unwrap();

        assert_eq!(
            found,
            vec![
                dir.path().join("a.json"),
                dir.path().join("b.json"),
                explicit.clone()
            ]
        );
    }

    #[test]
    fn test_files_with_extension_missing_dir() {
        let err = files_with_extension("json", &[], &["/definitely/not/here".to_string()])
            .unwrap_err();
        assert!(err.is_missing_resource());
    }

    #[test]
    fn test_files_with_extension_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("services.yaml");
        File::create(&file).unwrap();

        let err = files_with_extension("json", &[file.display().to_string()], &[]).unwrap_err();
        assert!(!err.is_missing_resource());
        assert!(err.to_string().contains("without extension 'json'"));
    }
}
