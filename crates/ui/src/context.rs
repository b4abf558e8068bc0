use std::path::PathBuf;
use std::sync::Arc;

use services::SurveyService;

pub trait UiApp: Send + Sync {
    fn survey_service(&self) -> Arc<SurveyService>;
    fn default_image_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    survey_service: Arc<SurveyService>,
    default_image_dir: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            survey_service: app.survey_service(),
            default_image_dir: app.default_image_dir(),
        }
    }

    #[must_use]
    pub fn survey_service(&self) -> Arc<SurveyService> {
        Arc::clone(&self.survey_service)
    }

    /// Directory opened when the survey view first mounts.
    #[must_use]
    pub fn default_image_dir(&self) -> PathBuf {
        self.default_image_dir.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
