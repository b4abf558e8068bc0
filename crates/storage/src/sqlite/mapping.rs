use chrono::{DateTime, Utc};
use sqlx::Row;
use survey_core::model::{AnswerCell, EvaluationRecord, RespondentMetadata};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn answers_to_json(answers: &[AnswerCell]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn map_evaluation_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<EvaluationRecord, StorageError> {
    let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(ser)?;
    let image_filename: String = row.try_get("image_filename").map_err(ser)?;
    let respondent = RespondentMetadata {
        name: row.try_get("name").map_err(ser)?,
        clinic: row.try_get("clinic").map_err(ser)?,
        specialization: row.try_get("specialization").map_err(ser)?,
        years_experience: row.try_get("years_experience").map_err(ser)?,
        avg_pano_cases_per_week: row.try_get("avg_pano_cases_per_week").map_err(ser)?,
    };
    let answers_json: String = row.try_get("answers").map_err(ser)?;
    let answers: Vec<AnswerCell> = serde_json::from_str(&answers_json).map_err(ser)?;

    Ok(EvaluationRecord::from_persisted(
        timestamp,
        image_filename,
        respondent,
        answers,
    ))
}
