use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::AnswerSet;
use crate::model::image::ImageId;
use crate::model::respondent::RespondentMetadata;
use crate::model::schema::SurveySchema;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const IMAGE_COLUMN: &str = "image_filename";

/// Fixed leading columns of every persisted row, in order.
pub const METADATA_COLUMNS: [&str; 7] = [
    TIMESTAMP_COLUMN,
    IMAGE_COLUMN,
    "name",
    "clinic",
    "specialization",
    "years_experience",
    "avg_pano_cases_per_week",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
    #[error("row has {cells} cells but the header has {columns}")]
    Width { columns: usize, cells: usize },
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// One flattened answer column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCell {
    pub key: String,
    pub value: String,
}

/// Immutable snapshot of one submitted evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    timestamp: DateTime<Utc>,
    image_filename: String,
    respondent: RespondentMetadata,
    answers: Vec<AnswerCell>,
}

impl EvaluationRecord {
    /// Flatten the current answers into a record, one cell per schema
    /// question in persisted column order.
    #[must_use]
    pub fn assemble(
        schema: &SurveySchema,
        timestamp: DateTime<Utc>,
        image: &ImageId,
        respondent: &RespondentMetadata,
        answers: &AnswerSet,
    ) -> Self {
        let answers = schema
            .persisted_order()
            .into_iter()
            .map(|question| AnswerCell {
                key: question.key.to_owned(),
                value: answers.flattened(question.key),
            })
            .collect();
        Self {
            timestamp,
            image_filename: image.as_str().to_owned(),
            respondent: respondent.clone(),
            answers,
        }
    }

    /// Rehydrate a record from storage.
    #[must_use]
    pub fn from_persisted(
        timestamp: DateTime<Utc>,
        image_filename: String,
        respondent: RespondentMetadata,
        answers: Vec<AnswerCell>,
    ) -> Self {
        Self {
            timestamp,
            image_filename,
            respondent,
            answers,
        }
    }

    /// Parse one tabular row given its header.
    ///
    /// Columns after the fixed metadata columns become answer cells, so logs
    /// written with an older question list still load.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` when the row is ragged, a fixed column is
    /// missing, or the timestamp does not parse.
    pub fn from_row(header: &[String], cells: &[String]) -> Result<Self, RecordError> {
        if header.len() != cells.len() {
            return Err(RecordError::Width {
                columns: header.len(),
                cells: cells.len(),
            });
        }

        let cell = |column: &'static str| -> Result<String, RecordError> {
            header
                .iter()
                .position(|name| name == column)
                .map(|idx| cells[idx].clone())
                .ok_or(RecordError::MissingColumn(column))
        };

        let timestamp = parse_timestamp(&cell(TIMESTAMP_COLUMN)?)?;
        let image_filename = cell(IMAGE_COLUMN)?;
        let respondent = RespondentMetadata {
            name: cell("name")?,
            clinic: cell("clinic")?,
            specialization: cell("specialization")?,
            years_experience: cell("years_experience")?,
            avg_pano_cases_per_week: cell("avg_pano_cases_per_week")?,
        };
        let answers = header
            .iter()
            .zip(cells)
            .filter(|(name, _)| !METADATA_COLUMNS.contains(&name.as_str()))
            .map(|(key, value)| AnswerCell {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        Ok(Self {
            timestamp,
            image_filename,
            respondent,
            answers,
        })
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn image_filename(&self) -> &str {
        &self.image_filename
    }

    #[must_use]
    pub fn respondent(&self) -> &RespondentMetadata {
        &self.respondent
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerCell] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|cell| cell.key == key)
            .map(|cell| cell.value.as_str())
    }

    /// Column names for this record's row.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        METADATA_COLUMNS
            .iter()
            .map(|c| (*c).to_owned())
            .chain(self.answers.iter().map(|cell| cell.key.clone()))
            .collect()
    }

    /// Cell values aligned with [`Self::columns`].
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(METADATA_COLUMNS.len() + self.answers.len());
        out.push(format_timestamp(self.timestamp));
        out.push(self.image_filename.clone());
        out.extend(self.respondent.fields().iter().map(|v| (*v).to_owned()));
        out.extend(self.answers.iter().map(|cell| cell.value.clone()));
        out
    }
}

/// RFC 3339, UTC, microsecond precision.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a persisted timestamp.
///
/// Accepts RFC 3339 and the offset-less ISO form (`2024-05-01T10:22:03.123456`)
/// found in older logs, which is read as UTC.
///
/// # Errors
///
/// Returns `RecordError::InvalidTimestamp` if neither form matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RecordError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::InvalidTimestamp(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::answer::{AnswerValue, LikertScore};
    use crate::time::fixed_now;

    fn sample() -> EvaluationRecord {
        let schema = SurveySchema::panoramic();
        let mut answers = AnswerSet::new();
        answers
            .set(
                &schema,
                "q1_realistic",
                AnswerValue::Likert(LikertScore::new(4).unwrap()),
            )
            .unwrap();
        answers
            .set(&schema, "comparative_quality", AnswerValue::Choice("Similar".into()))
            .unwrap();
        let respondent = RespondentMetadata {
            clinic: "City Dental".into(),
            ..RespondentMetadata::default()
        };
        EvaluationRecord::assemble(&schema, fixed_now(), &ImageId::new("b.jpg"), &respondent, &answers)
    }

    #[test]
    fn assemble_emits_one_cell_per_question() {
        let record = sample();
        assert_eq!(record.answers().len(), SurveySchema::panoramic().questions().len());
        assert_eq!(record.answer("q1_realistic"), Some("4"));
        assert_eq!(record.answer("comparative_quality"), Some("Similar"));
        assert_eq!(record.answer("q2_anatomy_visible"), Some(""));
        assert_eq!(record.columns().len(), record.cells().len());
        assert_eq!(record.columns()[1], "image_filename");
        assert_eq!(record.cells()[1], "b.jpg");
        assert_eq!(record.cells()[3], "City Dental");
    }

    #[test]
    fn header_matches_existing_log_layout() {
        let expected = "timestamp,image_filename,name,clinic,specialization,years_experience,\
avg_pano_cases_per_week,q1_realistic,q2_anatomy_visible,q3_contrast_brightness,q4_resolution,\
q5_artifacts,q6_landmarks,q7_confidence_diagnosis,q8_treatment_planning,q9_symmetry_arch,\
q10_alignment,q11_reduces_exposures,q12_workflow_efficient,q13_integrate_practice,\
q14_beneficial_no_pano,comparative_quality,aspects_better,aspects_need_improvement,\
strengths,limitations,recommendations,willing_future_studies";
        assert_eq!(sample().columns().join(","), expected);
    }

    #[test]
    fn row_parsing_restores_record() {
        let record = sample();
        let parsed = EvaluationRecord::from_row(&record.columns(), &record.cells()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn row_parsing_reports_problems() {
        let header = vec!["timestamp".to_string()];
        let err = EvaluationRecord::from_row(&header, &[]).unwrap_err();
        assert_eq!(err, RecordError::Width { columns: 1, cells: 0 });

        let err =
            EvaluationRecord::from_row(&header, &["2024-01-01T00:00:00Z".to_string()]).unwrap_err();
        assert_eq!(err, RecordError::MissingColumn(IMAGE_COLUMN));
    }

    #[test]
    fn legacy_timestamps_are_read_as_utc() {
        let ts = parse_timestamp("2024-05-01T10:22:03.123456").unwrap();
        assert_eq!(format_timestamp(ts), "2024-05-01T10:22:03.123456Z");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
