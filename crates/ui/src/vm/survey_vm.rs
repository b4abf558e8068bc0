use std::path::Path;

use services::{SessionStats, SurveyError, SurveyService, SurveySession};
use survey_core::model::{AnswerValue, LikertScore, RespondentMetadata};
use tracing::debug;

use crate::views::ViewError;
use crate::vm::form_vm::{FormSectionVm, NavVm, map_form, map_navigation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespondentField {
    Name,
    Clinic,
    Specialization,
    YearsExperience,
    WeeklyCases,
}

impl RespondentField {
    fn slot(self, respondent: &mut RespondentMetadata) -> &mut String {
        match self {
            RespondentField::Name => &mut respondent.name,
            RespondentField::Clinic => &mut respondent.clinic,
            RespondentField::Specialization => &mut respondent.specialization,
            RespondentField::YearsExperience => &mut respondent.years_experience,
            RespondentField::WeeklyCases => &mut respondent.avg_pano_cases_per_week,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyIntent {
    OpenDirectory(String),
    Refresh,
    Previous,
    Next,
    JumpTo(String),
    SetLikert { key: &'static str, score: u8 },
    SetChoice { key: &'static str, label: String },
    ToggleOption { key: &'static str, label: String },
    SetText { key: &'static str, text: String },
    SetRespondent { field: RespondentField, value: String },
}

/// Outcome of the most recent action, shown under the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyStatus {
    Idle,
    Saved { image: String, location: String },
    Failed(ViewError),
}

pub struct SurveyVm {
    session: SurveySession,
    directory_input: String,
    blocking: Option<ViewError>,
    status: SurveyStatus,
}

impl SurveyVm {
    /// Start a session and try to open `dir` straight away.
    #[must_use]
    pub fn start(service: &SurveyService, dir: &Path) -> Self {
        let mut vm = Self {
            session: service.start_session(),
            directory_input: dir.display().to_string(),
            blocking: None,
            status: SurveyStatus::Idle,
        };
        vm.open(dir);
        vm
    }

    fn open(&mut self, dir: &Path) {
        self.directory_input = dir.display().to_string();
        match self.session.open(dir) {
            Ok(_) => self.blocking = None,
            Err(err) => self.blocking = Some(ViewError::from(&err)),
        }
    }

    fn record(&mut self, result: Result<(), SurveyError>) {
        match result {
            Ok(()) => {
                if matches!(self.status, SurveyStatus::Failed(_)) {
                    self.status = SurveyStatus::Idle;
                }
            }
            Err(err) => {
                let view_err = ViewError::from(&err);
                if view_err.halts_form() {
                    self.blocking = Some(view_err);
                } else {
                    self.status = SurveyStatus::Failed(view_err);
                }
            }
        }
    }

    pub fn apply(&mut self, intent: SurveyIntent) {
        debug!(?intent, "survey intent");
        match intent {
            SurveyIntent::OpenDirectory(dir) => {
                self.status = SurveyStatus::Idle;
                self.open(Path::new(dir.trim()));
            }
            SurveyIntent::Refresh => {
                let result = self.session.refresh();
                if result.is_ok() {
                    self.blocking = None;
                }
                self.record(result);
            }
            SurveyIntent::Previous => {
                let result = self.session.previous().map(|_| ());
                self.record(result);
            }
            SurveyIntent::Next => {
                let result = self.session.next().map(|_| ());
                self.record(result);
            }
            SurveyIntent::JumpTo(name) => {
                let result = self.session.jump_to(&name).map(|_| ());
                self.record(result);
            }
            SurveyIntent::SetLikert { key, score } => {
                let result = LikertScore::new(score)
                    .map_err(SurveyError::from)
                    .and_then(|score| self.session.set_answer(key, AnswerValue::Likert(score)));
                self.record(result);
            }
            SurveyIntent::SetChoice { key, label } => {
                let result = self.session.set_answer(key, AnswerValue::Choice(label));
                self.record(result);
            }
            SurveyIntent::ToggleOption { key, label } => {
                let mut selected = match self.session.answers().get(key) {
                    Some(AnswerValue::Selection(labels)) => labels.clone(),
                    _ => Vec::new(),
                };
                if let Some(pos) = selected.iter().position(|item| *item == label) {
                    selected.remove(pos);
                } else {
                    selected.push(label);
                }
                if selected.is_empty() {
                    self.session.clear_answer(key);
                } else {
                    let result = self.session.set_answer(key, AnswerValue::Selection(selected));
                    self.record(result);
                }
            }
            SurveyIntent::SetText { key, text } => {
                if text.is_empty() {
                    self.session.clear_answer(key);
                } else {
                    let result = self.session.set_answer(key, AnswerValue::Text(text));
                    self.record(result);
                }
            }
            SurveyIntent::SetRespondent { field, value } => {
                let mut respondent = self.session.respondent().clone();
                *field.slot(&mut respondent) = value;
                self.session.set_respondent(respondent);
            }
        }
    }

    /// Append the current answers to the log.
    ///
    /// Failures are reported through [`SurveyVm::status`] and leave the
    /// answers in place for another attempt.
    pub async fn submit(&mut self) {
        self.status = match self.session.submit().await {
            Ok(record) => SurveyStatus::Saved {
                image: record.image_filename().to_string(),
                location: self.session.log_location(),
            },
            Err(err) => SurveyStatus::Failed(ViewError::from(&err)),
        };
    }

    #[must_use]
    pub fn navigation(&self) -> Option<NavVm> {
        map_navigation(self.session.navigator())
    }

    #[must_use]
    pub fn form(&self) -> Vec<FormSectionVm> {
        map_form(self.session.schema(), self.session.answers())
    }

    #[must_use]
    pub fn respondent(&self) -> &RespondentMetadata {
        self.session.respondent()
    }

    #[must_use]
    pub fn directory_input(&self) -> &str {
        &self.directory_input
    }

    /// Error that keeps the form hidden until a usable directory is opened.
    #[must_use]
    pub fn blocking_error(&self) -> Option<&ViewError> {
        self.blocking.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> &SurveyStatus {
        &self.status
    }

    #[must_use]
    pub fn log_location(&self) -> String {
        self.session.log_location()
    }

    #[must_use]
    pub fn submitted(&self) -> usize {
        self.session.submitted()
    }

    #[must_use]
    pub fn close(self) -> SessionStats {
        self.session.close()
    }
}
