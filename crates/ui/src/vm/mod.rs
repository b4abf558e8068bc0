mod export_vm;
mod form_vm;
mod survey_vm;

pub use export_vm::{ExportVm, map_export};
pub use form_vm::{ControlVm, FormSectionVm, NavVm, OptionVm, QuestionVm, map_form, map_navigation};
pub use survey_vm::{RespondentField, SurveyIntent, SurveyStatus, SurveyVm};
