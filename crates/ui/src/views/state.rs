use dioxus::prelude::*;
use services::{SurveyError, SurveyErrorKind};
use survey_core::model::{ImageSetError, NavigationError};

/// User-facing error, already reduced to what the view needs to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    DirectoryNotFound(String),
    NoImages(String),
    UnknownImage(String),
    InvalidAnswer(String),
    SaveFailed(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::DirectoryNotFound(dir) => format!("Directory not found: {dir}"),
            ViewError::NoImages(dir) => format!("No PNG/JPG images found in: {dir}"),
            ViewError::UnknownImage(name) => format!("Image not in the current set: {name}"),
            ViewError::InvalidAnswer(reason) => format!("Answer not accepted: {reason}"),
            ViewError::SaveFailed(reason) => format!("Could not save the evaluation: {reason}"),
            ViewError::Unknown => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Errors after which there is no image to evaluate.
    #[must_use]
    pub fn halts_form(&self) -> bool {
        matches!(self, ViewError::DirectoryNotFound(_) | ViewError::NoImages(_))
    }
}

impl From<&SurveyError> for ViewError {
    fn from(err: &SurveyError) -> Self {
        match err {
            SurveyError::DirectoryNotFound(path) | SurveyError::DirectoryUnreadable { path, .. } => {
                ViewError::DirectoryNotFound(path.display().to_string())
            }
            SurveyError::EmptyImageSet(ImageSetError::Empty { directory }) => {
                ViewError::NoImages(directory.display().to_string())
            }
            SurveyError::NoImages => ViewError::NoImages("the selected directory".to_string()),
            SurveyError::Navigation(NavigationError::UnknownImage { name }) => {
                ViewError::UnknownImage(name.clone())
            }
            _ => match err.kind() {
                SurveyErrorKind::Input => ViewError::InvalidAnswer(err.to_string()),
                SurveyErrorKind::Io => ViewError::SaveFailed(err.to_string()),
                _ => ViewError::Unknown,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
