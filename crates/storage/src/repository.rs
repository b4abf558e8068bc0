use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use survey_core::model::EvaluationRecord;
use thiserror::Error;

/// Errors surfaced by evaluation log backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("malformed log row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// Append-only sink for submitted evaluations.
///
/// `append` must write the whole record or nothing; callers never retry.
#[async_trait]
pub trait EvaluationLog: Send + Sync {
    /// Persist one record at the end of the log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record could not be written.
    async fn append(&self, record: &EvaluationRecord) -> Result<(), StorageError>;

    /// Every record appended so far, oldest first. Used for export only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read or parsed.
    async fn read_all(&self) -> Result<Vec<EvaluationRecord>, StorageError>;

    /// Human-readable location shown next to the form.
    fn location(&self) -> String;
}

/// Simple in-memory log for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryEvaluationLog {
    records: Arc<Mutex<Vec<EvaluationRecord>>>,
}

impl InMemoryEvaluationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn record_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl EvaluationLog for InMemoryEvaluationLog {
    async fn append(&self, record: &EvaluationRecord) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Holds the active evaluation log behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub evaluations: Arc<dyn EvaluationLog>,
}

impl Storage {
    #[must_use]
    pub fn new(evaluations: Arc<dyn EvaluationLog>) -> Self {
        Self { evaluations }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEvaluationLog::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::model::{AnswerSet, ImageId, RespondentMetadata, SurveySchema};
    use survey_core::time::fixed_now;

    fn record(image: &str) -> EvaluationRecord {
        EvaluationRecord::assemble(
            &SurveySchema::panoramic(),
            fixed_now(),
            &ImageId::new(image),
            &RespondentMetadata::default(),
            &AnswerSet::new(),
        )
    }

    #[tokio::test]
    async fn in_memory_log_keeps_append_order() {
        let log = InMemoryEvaluationLog::new();
        log.append(&record("a.png")).await.unwrap();
        log.append(&record("b.png")).await.unwrap();

        let all = log.read_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(EvaluationRecord::image_filename).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(log.record_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn storage_in_memory_shares_one_log() {
        let storage = Storage::in_memory();
        let clone = storage.clone();
        clone.evaluations.append(&record("a.png")).await.unwrap();
        assert_eq!(storage.evaluations.read_all().await.unwrap().len(), 1);
        assert_eq!(storage.evaluations.location(), "memory");
    }
}
