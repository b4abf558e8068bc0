use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::EvaluationLog;
use survey_core::model::{
    AnswerSet, AnswerValue, EvaluationRecord, ImageId, RespondentMetadata, SurveySchema,
};
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::SurveyError;

/// Answers for the image on screen, and the submit path to the log.
///
/// Answers are scoped to one image view: showing a different image discards
/// whatever was entered and not submitted.
pub struct SessionRecorder {
    schema: SurveySchema,
    clock: Clock,
    log: Arc<dyn EvaluationLog>,
    answers: AnswerSet,
    last_image: Option<ImageId>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl SessionRecorder {
    #[must_use]
    pub fn new(schema: SurveySchema, clock: Clock, log: Arc<dyn EvaluationLog>) -> Self {
        Self {
            schema,
            clock,
            log,
            answers: AnswerSet::new(),
            last_image: None,
            last_timestamp: None,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &SurveySchema {
        &self.schema
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    #[must_use]
    pub fn last_image(&self) -> Option<&ImageId> {
        self.last_image.as_ref()
    }

    /// Guard run before every interaction. Clears answers when `image` is
    /// not the image they were entered for. Returns true if it cleared.
    pub fn on_image_displayed(&mut self, image: &ImageId) -> bool {
        if self.last_image.as_ref() == Some(image) {
            return false;
        }
        if !self.answers.is_empty() {
            debug!(
                from = ?self.last_image,
                to = %image,
                discarded = self.answers.len(),
                "image changed, discarding unsubmitted answers"
            );
        }
        self.answers.clear();
        self.last_image = Some(image.clone());
        true
    }

    /// Store or overwrite one answer.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Answer` for keys or values the schema does not allow.
    pub fn set_answer(&mut self, key: &str, value: AnswerValue) -> Result<(), SurveyError> {
        self.answers.set(&self.schema, key, value)?;
        Ok(())
    }

    pub fn clear_answer(&mut self, key: &str) {
        self.answers.unset(key);
    }

    /// Append a record for `image` and reset the answers.
    ///
    /// The image is not advanced. On failure the answers are kept so the
    /// same submission can be retried.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Storage` if the log rejects the append.
    pub async fn submit(
        &mut self,
        respondent: &RespondentMetadata,
        image: &ImageId,
    ) -> Result<EvaluationRecord, SurveyError> {
        let timestamp = self.clock.now_after(self.last_timestamp);
        let record =
            EvaluationRecord::assemble(&self.schema, timestamp, image, respondent, &self.answers);

        if let Err(err) = self.log.append(&record).await {
            warn!(image = %image, error = %err, "evaluation not saved");
            return Err(err.into());
        }

        info!(
            image = %image,
            answered = self.answers.len(),
            anonymous = respondent.is_blank(),
            log = %self.log.location(),
            "evaluation saved"
        );
        self.last_timestamp = Some(timestamp);
        self.answers.clear();
        Ok(record)
    }
}

impl std::fmt::Debug for SessionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecorder")
            .field("answers", &self.answers)
            .field("last_image", &self.last_image)
            .field("last_timestamp", &self.last_timestamp)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use storage::{InMemoryEvaluationLog, StorageError};
    use survey_core::model::LikertScore;
    use survey_core::time::{fixed_clock, fixed_now};

    struct FailingLog;

    #[async_trait]
    impl EvaluationLog for FailingLog {
        async fn append(&self, _record: &EvaluationRecord) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }

        async fn read_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
            Ok(Vec::new())
        }

        fn location(&self) -> String {
            "failing".into()
        }
    }

    fn likert(v: u8) -> AnswerValue {
        AnswerValue::Likert(LikertScore::new(v).unwrap())
    }

    #[test]
    fn changing_image_clears_answers() {
        let mut recorder = SessionRecorder::new(
            SurveySchema::panoramic(),
            fixed_clock(),
            Arc::new(InMemoryEvaluationLog::new()),
        );
        let a = ImageId::new("a.png");
        let b = ImageId::new("b.png");

        assert!(recorder.on_image_displayed(&a));
        recorder.set_answer("q1_realistic", likert(5)).unwrap();
        assert!(!recorder.on_image_displayed(&a));
        assert_eq!(recorder.answers().len(), 1);

        assert!(recorder.on_image_displayed(&b));
        assert!(recorder.answers().is_empty());
    }

    #[tokio::test]
    async fn submit_appends_and_clears() {
        let log = InMemoryEvaluationLog::new();
        let mut recorder =
            SessionRecorder::new(SurveySchema::panoramic(), fixed_clock(), Arc::new(log.clone()));
        let image = ImageId::new("b.jpg");
        recorder.on_image_displayed(&image);
        recorder.set_answer("q1_realistic", likert(4)).unwrap();

        let record = recorder
            .submit(&RespondentMetadata::default(), &image)
            .await
            .unwrap();

        assert_eq!(record.image_filename(), "b.jpg");
        assert_eq!(record.answer("q1_realistic"), Some("4"));
        assert!(recorder.answers().is_empty());
        assert_eq!(recorder.last_image(), Some(&image));
        assert_eq!(log.record_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_submit_keeps_answers() {
        let mut recorder =
            SessionRecorder::new(SurveySchema::panoramic(), fixed_clock(), Arc::new(FailingLog));
        let image = ImageId::new("a.png");
        recorder.on_image_displayed(&image);
        recorder.set_answer("q2_anatomy_visible", likert(3)).unwrap();

        let err = recorder
            .submit(&RespondentMetadata::default(), &image)
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::Storage(_)));
        assert_eq!(recorder.answers().len(), 1);
    }

    #[tokio::test]
    async fn timestamps_never_decrease() {
        let log = InMemoryEvaluationLog::new();
        let later = Clock::fixed(fixed_now() + Duration::minutes(10));
        let mut recorder = SessionRecorder::new(SurveySchema::panoramic(), later, Arc::new(log));
        let image = ImageId::new("a.png");
        recorder.on_image_displayed(&image);
        let first = recorder
            .submit(&RespondentMetadata::default(), &image)
            .await
            .unwrap();

        // Wall clock steps back ten minutes.
        recorder.clock = fixed_clock();
        let second = recorder
            .submit(&RespondentMetadata::default(), &image)
            .await
            .unwrap();
        assert!(second.timestamp() >= first.timestamp());
    }
}
