mod answer;
mod image;
mod navigation;
mod record;
mod respondent;
mod schema;

pub use answer::{AnswerError, AnswerSet, AnswerValue, LikertScore, MULTI_SELECT_DELIMITER};
pub use image::{ACCEPTED_EXTENSIONS, ImageId, ImageSet, ImageSetError, is_accepted_image};
pub use navigation::{NavigationError, NavigationState, clamp};
pub use record::{
    AnswerCell, EvaluationRecord, IMAGE_COLUMN, METADATA_COLUMNS, RecordError, TIMESTAMP_COLUMN,
    format_timestamp, parse_timestamp,
};
pub use respondent::{
    RespondentMetadata, SPECIALIZATION_OPTIONS, WEEKLY_CASES_OPTIONS, YEARS_EXPERIENCE_OPTIONS,
};
pub use schema::{
    ASPECT_OPTIONS, COMPARATIVE_QUALITY_OPTIONS, PANORAMIC_COLUMNS, PANORAMIC_QUESTIONS, Question, QuestionKind,
    SchemaError, Section, SurveySchema, YES_NO_OPTIONS,
};
