use std::path::{Path, PathBuf};
use std::sync::Arc;

use survey_core::model::{ImageId, ImageSet, NavigationState};
use tracing::{debug, info, warn};

use crate::error::SurveyError;
use crate::image_source::ImageDirectory;

/// Position within the configured image directory.
///
/// Keeps the last index across failed loads so that fixing a typo in the
/// directory returns the user to where they were (clamped to the new size).
pub struct Navigator {
    source: Arc<dyn ImageDirectory>,
    directory: Option<PathBuf>,
    state: Option<NavigationState>,
    remembered_index: usize,
}

impl Navigator {
    #[must_use]
    pub fn new(source: Arc<dyn ImageDirectory>) -> Self {
        Self {
            source,
            directory: None,
            state: None,
            remembered_index: 0,
        }
    }

    /// Load (or reload) `dir`, clamping the previous index into the new set.
    ///
    /// On failure no image set is kept and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::DirectoryNotFound` or `SurveyError::EmptyImageSet`.
    pub fn load(&mut self, dir: &Path) -> Result<&ImageSet, SurveyError> {
        if let Some(state) = self.state.take() {
            self.remembered_index = state.current_index();
        }
        self.directory = Some(dir.to_path_buf());

        let images = match self.source.list(dir) {
            Ok(images) => images,
            Err(err) => {
                warn!(directory = %dir.display(), error = %err, "failed to load images");
                return Err(err);
            }
        };

        info!(directory = %dir.display(), count = images.len(), "loaded image set");
        let state = self
            .state
            .insert(NavigationState::with_index(images, self.remembered_index));
        Ok(state.images())
    }

    /// Re-read the current directory.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if no directory was ever loaded, or
    /// whatever [`Self::load`] returns.
    pub fn reload(&mut self) -> Result<&ImageSet, SurveyError> {
        let dir = self.directory.clone().ok_or(SurveyError::NoImages)?;
        self.load(&dir)
    }

    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    #[must_use]
    pub fn images(&self) -> Option<&ImageSet> {
        self.state.as_ref().map(NavigationState::images)
    }

    #[must_use]
    pub fn current(&self) -> Option<&ImageId> {
        self.state.as_ref().map(NavigationState::current)
    }

    /// Full path of the displayed image.
    #[must_use]
    pub fn current_path(&self) -> Option<PathBuf> {
        let state = self.state.as_ref()?;
        Some(state.images().path_of(state.current()))
    }

    /// One-based position and total, for an "Image i / n" indicator.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        self.state
            .as_ref()
            .map(|s| (s.current_index() + 1, s.images().len()))
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.state.as_ref().map(NavigationState::current_index)
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if nothing is loaded.
    pub fn previous(&mut self) -> Result<&ImageId, SurveyError> {
        let state = self.state.as_mut().ok_or(SurveyError::NoImages)?;
        if !state.previous() {
            debug!("already at first image");
        }
        Ok(state.current())
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if nothing is loaded.
    pub fn next(&mut self) -> Result<&ImageId, SurveyError> {
        let state = self.state.as_mut().ok_or(SurveyError::NoImages)?;
        if !state.next() {
            debug!("already at last image");
        }
        Ok(state.current())
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if nothing is loaded and
    /// `SurveyError::Navigation` if `name` is not in the set.
    pub fn jump_to(&mut self, name: &str) -> Result<&ImageId, SurveyError> {
        let state = self.state.as_mut().ok_or(SurveyError::NoImages)?;
        state.jump_to(name)?;
        Ok(state.current())
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("directory", &self.directory)
            .field("current_index", &self.current_index())
            .field("remembered_index", &self.remembered_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use survey_core::model::{ImageSetError, NavigationError};

    /// Directory stub whose contents can change between loads.
    struct StubDirectory {
        names: Mutex<Vec<&'static str>>,
    }

    impl StubDirectory {
        fn new(names: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                names: Mutex::new(names.to_vec()),
            })
        }

        fn set(&self, names: &[&'static str]) {
            *self.names.lock().unwrap() = names.to_vec();
        }
    }

    impl ImageDirectory for StubDirectory {
        fn list(&self, dir: &Path) -> Result<ImageSet, SurveyError> {
            if dir == Path::new("/missing") {
                return Err(SurveyError::DirectoryNotFound(dir.to_path_buf()));
            }
            let names = self.names.lock().unwrap().clone();
            Ok(ImageSet::from_file_names(dir, names)?)
        }
    }

    #[test]
    fn starts_at_first_image() {
        let mut nav = Navigator::new(StubDirectory::new(&["b.jpg", "a.png"]));
        nav.load(Path::new("/imgs")).unwrap();
        assert_eq!(nav.current().unwrap().as_str(), "a.png");
        assert_eq!(nav.position(), Some((1, 2)));
        assert_eq!(nav.current_path(), Some(PathBuf::from("/imgs/a.png")));
    }

    #[test]
    fn boundaries_are_noops() {
        let mut nav = Navigator::new(StubDirectory::new(&["a.png", "b.png"]));
        nav.load(Path::new("/imgs")).unwrap();
        assert_eq!(nav.previous().unwrap().as_str(), "a.png");
        assert_eq!(nav.next().unwrap().as_str(), "b.png");
        assert_eq!(nav.next().unwrap().as_str(), "b.png");
    }

    #[test]
    fn unknown_jump_keeps_position() {
        let mut nav = Navigator::new(StubDirectory::new(&["a.png", "b.png"]));
        nav.load(Path::new("/imgs")).unwrap();
        nav.next().unwrap();
        let err = nav.jump_to("zzz.png").unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Navigation(NavigationError::UnknownImage { .. })
        ));
        assert_eq!(nav.current_index(), Some(1));
    }

    #[test]
    fn reload_clamps_when_directory_shrinks() {
        let stub = StubDirectory::new(&["a.png", "b.png", "c.png"]);
        let mut nav = Navigator::new(stub.clone());
        nav.load(Path::new("/imgs")).unwrap();
        nav.jump_to("c.png").unwrap();

        stub.set(&["a.png", "b.png"]);
        nav.reload().unwrap();
        assert_eq!(nav.current().unwrap().as_str(), "b.png");
    }

    #[test]
    fn failed_load_drops_images_but_remembers_index() {
        let mut nav = Navigator::new(StubDirectory::new(&["a.png", "b.png"]));
        nav.load(Path::new("/imgs")).unwrap();
        nav.next().unwrap();

        let err = nav.load(Path::new("/missing")).unwrap_err();
        assert!(matches!(err, SurveyError::DirectoryNotFound(_)));
        assert!(nav.images().is_none());
        assert!(matches!(nav.next(), Err(SurveyError::NoImages)));

        nav.load(Path::new("/imgs")).unwrap();
        assert_eq!(nav.current().unwrap().as_str(), "b.png");
    }

    #[test]
    fn empty_directory_surfaces_error() {
        let stub = StubDirectory::new(&["notes.txt"]);
        let mut nav = Navigator::new(stub);
        let err = nav.load(Path::new("/imgs")).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::EmptyImageSet(ImageSetError::Empty { .. })
        ));
        assert!(nav.current().is_none());
    }

    #[test]
    fn reload_without_directory_fails() {
        let mut nav = Navigator::new(StubDirectory::new(&["a.png"]));
        assert!(matches!(nav.reload(), Err(SurveyError::NoImages)));
    }
}
