use std::path::Path;

use survey_core::model::ImageSet;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::SurveyError;

/// Lists the candidate images of a directory.
pub trait ImageDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns `SurveyError::DirectoryNotFound` when `dir` is missing or not a
    /// directory, `SurveyError::EmptyImageSet` when it holds no accepted
    /// images.
    fn list(&self, dir: &Path) -> Result<ImageSet, SurveyError>;
}

/// Reads the file system, looking only at regular files directly inside `dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageDirectory;

impl ImageDirectory for FsImageDirectory {
    fn list(&self, dir: &Path) -> Result<ImageSet, SurveyError> {
        if !dir.is_dir() {
            return Err(SurveyError::DirectoryNotFound(dir.to_path_buf()));
        }

        // Absolute paths keep image sources valid whatever the UI resolves against.
        let dir = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = err.into_io_error().unwrap_or_else(|| {
                        std::io::Error::other("directory walk failed")
                    });
                    return Err(SurveyError::DirectoryUnreadable {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
                // Broken links and entries that vanished mid-walk are not images.
                Err(_) => continue,
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_owned()),
                None => debug!(path = %entry.path().display(), "skipping non UTF-8 file name"),
            }
        }

        Ok(ImageSet::from_file_names(dir, names)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_only_images_in_top_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.JPG"), b"x").unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        fs::write(dir.path().join("nested.png").join("c.png"), b"x").unwrap();

        let set = FsImageDirectory.list(dir.path()).unwrap();
        let names: Vec<&str> = set.names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
    }

    #[test]
    fn missing_directory_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsImageDirectory
            .list(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, SurveyError::DirectoryNotFound(_)));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        fs::write(&file, b"x").unwrap();
        let err = FsImageDirectory.list(&file).unwrap_err();
        assert!(matches!(err, SurveyError::DirectoryNotFound(_)));
    }

    #[test]
    fn directory_without_images_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), b"x").unwrap();
        let err = FsImageDirectory.list(dir.path()).unwrap_err();
        assert!(matches!(err, SurveyError::EmptyImageSet(_)));
    }

    #[test]
    fn listed_directory_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();

        let set = FsImageDirectory.list(&dir.path().join("sub").join("..")).unwrap();
        let canonical = fs::canonicalize(dir.path()).unwrap();
        assert!(set.directory().is_absolute());
        assert_eq!(set.directory(), canonical.as_path());
        assert_eq!(set.path_of(&set.names()[0]), canonical.join("a.png"));
    }
}
