use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::EvaluationLog;
use storage::csv::render_csv;
use survey_core::model::{
    AnswerSet, AnswerValue, EvaluationRecord, ImageId, ImageSet, RespondentMetadata, SurveySchema,
};
use tracing::info;

use crate::Clock;
use crate::error::SurveyError;
use crate::image_source::{FsImageDirectory, ImageDirectory};
use crate::navigator::Navigator;
use crate::recorder::SessionRecorder;

/// Creates survey sessions that share one schema, clock and log.
#[derive(Clone)]
pub struct SurveyService {
    clock: Clock,
    schema: SurveySchema,
    images: Arc<dyn ImageDirectory>,
    log: Arc<dyn EvaluationLog>,
}

impl SurveyService {
    #[must_use]
    pub fn new(clock: Clock, schema: SurveySchema, log: Arc<dyn EvaluationLog>) -> Self {
        Self {
            clock,
            schema,
            images: Arc::new(FsImageDirectory),
            log,
        }
    }

    #[must_use]
    pub fn with_image_directory(mut self, images: Arc<dyn ImageDirectory>) -> Self {
        self.images = images;
        self
    }

    #[must_use]
    pub fn schema(&self) -> &SurveySchema {
        &self.schema
    }

    /// Where submitted evaluations end up.
    #[must_use]
    pub fn log_location(&self) -> String {
        self.log.location()
    }

    /// Start a fresh session with no directory loaded.
    #[must_use]
    pub fn start_session(&self) -> SurveySession {
        let started_at = self.clock.now();
        info!(log = %self.log.location(), "survey session started");
        SurveySession {
            navigator: Navigator::new(Arc::clone(&self.images)),
            recorder: SessionRecorder::new(self.schema, self.clock, Arc::clone(&self.log)),
            log: Arc::clone(&self.log),
            clock: self.clock,
            respondent: RespondentMetadata::default(),
            started_at,
            submitted: 0,
        }
    }

    /// Every evaluation in the log, for export.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Storage` if the log cannot be read.
    pub async fn export(&self) -> Result<Vec<EvaluationRecord>, SurveyError> {
        Ok(self.log.read_all().await?)
    }

    /// The whole log as one CSV document, header first.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Storage` if the log cannot be read.
    pub async fn export_csv(&self) -> Result<String, SurveyError> {
        let records = self.export().await?;
        Ok(render_csv(&records))
    }
}

/// What a session did, reported when it is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub started_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub submitted: usize,
}

/// Per-user session state: where they are and what they have entered.
///
/// Each operation first runs [`SurveySession::sync`], the guard that drops
/// answers left over from a different image.
pub struct SurveySession {
    navigator: Navigator,
    recorder: SessionRecorder,
    log: Arc<dyn EvaluationLog>,
    clock: Clock,
    respondent: RespondentMetadata,
    started_at: DateTime<Utc>,
    submitted: usize,
}

impl SurveySession {
    /// Point the session at an image directory.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::DirectoryNotFound` or `SurveyError::EmptyImageSet`;
    /// the session then has no images until a later `open` succeeds.
    pub fn open(&mut self, dir: &Path) -> Result<&ImageSet, SurveyError> {
        let result = self.navigator.load(dir).map(|_| ());
        self.sync();
        result?;
        self.navigator.images().ok_or(SurveyError::NoImages)
    }

    /// Re-read the current directory, e.g. after files were added.
    ///
    /// # Errors
    ///
    /// See [`SurveySession::open`].
    pub fn refresh(&mut self) -> Result<(), SurveyError> {
        let result = self.navigator.reload().map(|_| ());
        self.sync();
        result
    }

    /// Clear answers if the displayed image is not the one they belong to.
    /// Returns true if answers were cleared.
    pub fn sync(&mut self) -> bool {
        match self.navigator.current() {
            Some(image) => self.recorder.on_image_displayed(image),
            None => false,
        }
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if nothing is loaded.
    pub fn previous(&mut self) -> Result<&ImageId, SurveyError> {
        self.navigator.previous()?;
        self.sync();
        self.current().ok_or(SurveyError::NoImages)
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if nothing is loaded.
    pub fn next(&mut self) -> Result<&ImageId, SurveyError> {
        self.navigator.next()?;
        self.sync();
        self.current().ok_or(SurveyError::NoImages)
    }

    /// # Errors
    ///
    /// Returns `SurveyError::Navigation` for names outside the loaded set.
    pub fn jump_to(&mut self, name: &str) -> Result<&ImageId, SurveyError> {
        self.navigator.jump_to(name)?;
        self.sync();
        self.current().ok_or(SurveyError::NoImages)
    }

    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` when no image is displayed, or
    /// `SurveyError::Answer` when the schema rejects the value.
    pub fn set_answer(&mut self, key: &str, value: AnswerValue) -> Result<(), SurveyError> {
        self.sync();
        if self.navigator.current().is_none() {
            return Err(SurveyError::NoImages);
        }
        self.recorder.set_answer(key, value)
    }

    pub fn clear_answer(&mut self, key: &str) {
        self.sync();
        self.recorder.clear_answer(key);
    }

    pub fn set_respondent(&mut self, respondent: RespondentMetadata) {
        self.respondent = respondent;
    }

    /// Submit the answers for the displayed image.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::NoImages` if nothing is displayed and
    /// `SurveyError::Storage` if the append fails (answers are kept).
    pub async fn submit(&mut self) -> Result<EvaluationRecord, SurveyError> {
        self.sync();
        let image = self.navigator.current().cloned().ok_or(SurveyError::NoImages)?;
        let record = self.recorder.submit(&self.respondent, &image).await?;
        self.submitted += 1;
        Ok(record)
    }

    /// Every evaluation in the shared log, for download.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::Storage` if the log cannot be read.
    pub async fn export(&self) -> Result<Vec<EvaluationRecord>, SurveyError> {
        Ok(self.log.read_all().await?)
    }

    /// End the session.
    #[must_use]
    pub fn close(self) -> SessionStats {
        let stats = SessionStats {
            started_at: self.started_at,
            closed_at: self.clock.now(),
            submitted: self.submitted,
        };
        info!(submitted = stats.submitted, "survey session closed");
        stats
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn current(&self) -> Option<&ImageId> {
        self.navigator.current()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        self.recorder.answers()
    }

    #[must_use]
    pub fn respondent(&self) -> &RespondentMetadata {
        &self.respondent
    }

    #[must_use]
    pub fn schema(&self) -> &SurveySchema {
        self.recorder.schema()
    }

    #[must_use]
    pub fn log_location(&self) -> String {
        self.log.location()
    }

    #[must_use]
    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl std::fmt::Debug for SurveySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveySession")
            .field("navigator", &self.navigator)
            .field("recorder", &self.recorder)
            .field("started_at", &self.started_at)
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use storage::InMemoryEvaluationLog;
    use survey_core::model::LikertScore;
    use survey_core::time::fixed_clock;

    fn service(log: &InMemoryEvaluationLog) -> SurveyService {
        SurveyService::new(fixed_clock(), SurveySchema::panoramic(), Arc::new(log.clone()))
    }

    fn image_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"img").unwrap();
        }
        dir
    }

    #[test]
    fn navigating_away_discards_answers() {
        let log = InMemoryEvaluationLog::new();
        let dir = image_dir(&["a.png", "b.png"]);
        let mut session = service(&log).start_session();
        session.open(dir.path()).unwrap();

        session
            .set_answer("q1_realistic", AnswerValue::Likert(LikertScore::new(5).unwrap()))
            .unwrap();
        session.next().unwrap();
        assert!(session.answers().is_empty());

        session
            .set_answer("q1_realistic", AnswerValue::Likert(LikertScore::new(2).unwrap()))
            .unwrap();
        session.next().unwrap();
        assert_eq!(session.answers().len(), 1, "staying on the last image keeps answers");
    }

    #[test]
    fn respondent_survives_navigation() {
        let log = InMemoryEvaluationLog::new();
        let dir = image_dir(&["a.png", "b.png"]);
        let mut session = service(&log).start_session();
        session.open(dir.path()).unwrap();
        session.set_respondent(RespondentMetadata {
            name: "Dr. Lee".into(),
            ..RespondentMetadata::default()
        });
        session.next().unwrap();
        assert_eq!(session.respondent().name, "Dr. Lee");
    }

    #[test]
    fn answers_need_a_displayed_image() {
        let log = InMemoryEvaluationLog::new();
        let mut session = service(&log).start_session();
        let err = session
            .set_answer("strengths", AnswerValue::Text("ok".into()))
            .unwrap_err();
        assert!(matches!(err, SurveyError::NoImages));
    }

    #[tokio::test]
    async fn submit_stays_on_image_and_counts() {
        let log = InMemoryEvaluationLog::new();
        let dir = image_dir(&["a.png", "b.png"]);
        let mut session = service(&log).start_session();
        session.open(dir.path()).unwrap();

        session.submit().await.unwrap();
        assert_eq!(session.current().unwrap().as_str(), "a.png");
        session.submit().await.unwrap();

        let stats = session.close();
        assert_eq!(stats.submitted, 2);
        assert_eq!(log.record_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn submit_without_images_fails() {
        let log = InMemoryEvaluationLog::new();
        let mut session = service(&log).start_session();
        let err = session.open(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.halts_form());
        assert!(matches!(session.submit().await, Err(SurveyError::NoImages)));
        assert_eq!(log.record_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn export_csv_renders_header_and_rows() {
        let log = InMemoryEvaluationLog::new();
        let dir = image_dir(&["a.png"]);
        let service = service(&log);
        assert!(service.export_csv().await.unwrap().is_empty());

        let mut session = service.start_session();
        session.open(dir.path()).unwrap();
        session.submit().await.unwrap();

        let doc = service.export_csv().await.unwrap();
        let mut lines = doc.lines();
        assert!(lines.next().unwrap().starts_with("timestamp,image_filename,name"));
        assert!(lines.next().unwrap().contains(",a.png,"));
        assert!(lines.next().is_none());
    }

    struct FixedDirectory;

    impl ImageDirectory for FixedDirectory {
        fn list(&self, dir: &Path) -> Result<ImageSet, SurveyError> {
            Ok(ImageSet::from_file_names(dir, ["scan-2.png", "scan-1.png"])?)
        }
    }

    #[tokio::test]
    async fn sessions_use_the_injected_image_directory() {
        let log = InMemoryEvaluationLog::new();
        let service = service(&log).with_image_directory(Arc::new(FixedDirectory));
        let mut session = service.start_session();

        let images = session.open(Path::new("/scanner/export")).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(session.current().unwrap().as_str(), "scan-1.png");

        session.submit().await.unwrap();
        let records = service.export().await.unwrap();
        assert_eq!(records[0].image_filename(), "scan-1.png");
    }
}
