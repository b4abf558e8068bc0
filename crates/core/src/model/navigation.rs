use thiserror::Error;

use crate::model::image::{ImageId, ImageSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("image not in the current set: {name}")]
    UnknownImage { name: String },
}

/// Clamp `index` into `[0, len - 1]`. Returns 0 for an empty range.
#[must_use]
pub fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Cursor over a loaded `ImageSet`.
///
/// The index always satisfies `current_index < images.len()`; every mutation
/// re-applies [`clamp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    images: ImageSet,
    current_index: usize,
}

impl NavigationState {
    #[must_use]
    pub fn new(images: ImageSet) -> Self {
        Self::with_index(images, 0)
    }

    /// Start at `index`, clamped to the set. Used when a directory is
    /// reloaded and the previous index may be stale.
    #[must_use]
    pub fn with_index(images: ImageSet, index: usize) -> Self {
        let current_index = clamp(index, images.len());
        Self {
            images,
            current_index,
        }
    }

    /// Swap in a freshly loaded set, keeping the current index where possible.
    pub fn replace_images(&mut self, images: ImageSet) {
        self.current_index = clamp(self.current_index, images.len());
        self.images = images;
    }

    #[must_use]
    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current(&self) -> &ImageId {
        &self.images.names()[self.current_index]
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.images.len()
    }

    /// Step back one image. Returns false (and does nothing) at the start.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_index = clamp(self.current_index - 1, self.images.len());
        true
    }

    /// Step forward one image. Returns false (and does nothing) at the end.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_index = clamp(self.current_index + 1, self.images.len());
        true
    }

    /// Move to the image called `name`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::UnknownImage` if the name is not in the set;
    /// the index is left untouched.
    pub fn jump_to(&mut self, name: &str) -> Result<usize, NavigationError> {
        let index = self
            .images
            .position(name)
            .ok_or_else(|| NavigationError::UnknownImage {
                name: name.to_owned(),
            })?;
        self.current_index = clamp(index, self.images.len());
        Ok(self.current_index)
    }
}
