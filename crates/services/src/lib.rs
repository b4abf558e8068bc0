#![forbid(unsafe_code)]

pub mod error;
pub mod image_source;
pub mod navigator;
pub mod recorder;
pub mod survey;

pub use storage::csv::render_csv;
pub use survey_core::Clock;

pub use error::{SurveyError, SurveyErrorKind};
pub use image_source::{FsImageDirectory, ImageDirectory};
pub use navigator::Navigator;
pub use recorder::SessionRecorder;
pub use survey::{SessionStats, SurveyService, SurveySession};
