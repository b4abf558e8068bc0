//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use storage::StorageError;
use survey_core::model::{AnswerError, ImageSetError, NavigationError};

/// Errors surfaced to the person filling in the survey.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SurveyError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("cannot read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    EmptyImageSet(#[from] ImageSetError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("no image directory is loaded")]
    NoImages,
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Coarse error category, used to decide what the form can still show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyErrorKind {
    Config,
    EmptyImageSet,
    UnknownImage,
    Input,
    Io,
}

impl SurveyError {
    #[must_use]
    pub fn kind(&self) -> SurveyErrorKind {
        match self {
            SurveyError::DirectoryNotFound(_)
            | SurveyError::DirectoryUnreadable { .. }
            | SurveyError::NoImages => SurveyErrorKind::Config,
            SurveyError::EmptyImageSet(_) => SurveyErrorKind::EmptyImageSet,
            SurveyError::Navigation(_) => SurveyErrorKind::UnknownImage,
            SurveyError::Answer(_) => SurveyErrorKind::Input,
            SurveyError::Storage(_) => SurveyErrorKind::Io,
        }
    }

    /// True when the evaluation form cannot be shown until the directory is fixed.
    #[must_use]
    pub fn halts_form(&self) -> bool {
        matches!(
            self.kind(),
            SurveyErrorKind::Config | SurveyErrorKind::EmptyImageSet
        )
    }
}
