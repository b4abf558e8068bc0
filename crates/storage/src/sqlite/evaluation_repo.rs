use survey_core::model::EvaluationRecord;
use tracing::{debug, warn};

use super::{
    SqliteEvaluationLog,
    mapping::{answers_to_json, map_evaluation_row},
};
use crate::repository::{EvaluationLog, StorageError};

#[async_trait::async_trait]
impl EvaluationLog for SqliteEvaluationLog {
    async fn append(&self, record: &EvaluationRecord) -> Result<(), StorageError> {
        let respondent = record.respondent();
        let res = sqlx::query(
            r"
                INSERT INTO evaluations (
                    timestamp, image_filename, name, clinic, specialization,
                    years_experience, avg_pano_cases_per_week, answers
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(record.timestamp())
        .bind(record.image_filename())
        .bind(&respondent.name)
        .bind(&respondent.clinic)
        .bind(&respondent.specialization)
        .bind(&respondent.years_experience)
        .bind(&respondent.avg_pano_cases_per_week)
        .bind(answers_to_json(record.answers())?)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) => {
                debug!(
                    id = done.last_insert_rowid(),
                    image = record.image_filename(),
                    "inserted evaluation"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to insert evaluation");
                Err(StorageError::Connection(e.to_string()))
            }
        }
    }

    async fn read_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, timestamp, image_filename, name, clinic, specialization,
                    years_experience, avg_pano_cases_per_week, answers
                FROM evaluations
                ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_evaluation_row(&row)?);
        }
        Ok(out)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}
