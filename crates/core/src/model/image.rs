use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File extensions accepted as evaluable images, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageSetError {
    #[error("no PNG/JPG images found in: {}", .directory.display())]
    Empty { directory: PathBuf },
}

/// File name of an image inside the loaded directory.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(String);

impl ImageId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Returns true if `name` ends in one of [`ACCEPTED_EXTENSIONS`].
#[must_use]
pub fn is_accepted_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Ordered, non-empty set of images from one directory.
///
/// Names are filtered by extension and sorted so that the same directory
/// always yields the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    directory: PathBuf,
    images: Vec<ImageId>,
}

impl ImageSet {
    /// Build a set from raw directory entry names.
    ///
    /// # Errors
    ///
    /// Returns `ImageSetError::Empty` if no name has an accepted extension.
    pub fn from_file_names<I, S>(directory: impl Into<PathBuf>, names: I) -> Result<Self, ImageSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directory = directory.into();
        let mut images: Vec<ImageId> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| is_accepted_image(name))
            .map(ImageId::new)
            .collect();

        if images.is_empty() {
            return Err(ImageSetError::Empty { directory });
        }

        images.sort();
        images.dedup();
        Ok(Self { directory, images })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ImageId> {
        self.images.get(index)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.images.iter().position(|image| image.as_str() == name)
    }

    #[must_use]
    pub fn names(&self) -> &[ImageId] {
        &self.images
    }

    /// Full path of an image in this set.
    #[must_use]
    pub fn path_of(&self, image: &ImageId) -> PathBuf {
        self.directory.join(image.as_str())
    }
}
