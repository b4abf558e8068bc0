use services::Navigator;
use survey_core::model::{AnswerSet, AnswerValue, LikertScore, QuestionKind, SurveySchema};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlVm {
    Likert { scale: Vec<u8>, selected: Option<u8> },
    Radio { options: Vec<OptionVm> },
    Checkboxes { options: Vec<OptionVm> },
    TextArea { value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub key: &'static str,
    pub prompt: &'static str,
    pub control: ControlVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSectionVm {
    pub title: &'static str,
    pub hint: Option<&'static str>,
    pub questions: Vec<QuestionVm>,
}

fn option_list(options: &'static [&'static str], is_selected: impl Fn(&str) -> bool) -> Vec<OptionVm> {
    options
        .iter()
        .map(|label| OptionVm {
            label,
            selected: is_selected(label),
        })
        .collect()
}

/// Build the form from the schema, reflecting the answers entered so far.
#[must_use]
pub fn map_form(schema: &SurveySchema, answers: &AnswerSet) -> Vec<FormSectionVm> {
    schema
        .sections()
        .into_iter()
        .map(|(section, questions)| FormSectionVm {
            title: section.title(),
            hint: section.hint(),
            questions: questions
                .into_iter()
                .map(|question| {
                    let answer = answers.get(question.key);
                    let control = match question.kind {
                        QuestionKind::Likert => ControlVm::Likert {
                            scale: LikertScore::scale().map(LikertScore::value).collect(),
                            selected: match answer {
                                Some(AnswerValue::Likert(score)) => Some(score.value()),
                                _ => None,
                            },
                        },
                        QuestionKind::SingleChoice(options) => ControlVm::Radio {
                            options: option_list(options, |label| {
                                matches!(answer, Some(AnswerValue::Choice(c)) if c == label)
                            }),
                        },
                        QuestionKind::MultiChoice(options) => ControlVm::Checkboxes {
                            options: option_list(options, |label| {
                                matches!(answer, Some(AnswerValue::Selection(s)) if s.iter().any(|x| x == label))
                            }),
                        },
                        QuestionKind::FreeText => ControlVm::TextArea {
                            value: match answer {
                                Some(AnswerValue::Text(text)) => text.clone(),
                                _ => String::new(),
                            },
                        },
                    };
                    QuestionVm {
                        key: question.key,
                        prompt: question.prompt,
                        control,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Sidebar navigation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavVm {
    pub position_label: String,
    pub current: String,
    pub image_src: String,
    pub names: Vec<String>,
    pub can_previous: bool,
    pub can_next: bool,
}

#[must_use]
pub fn map_navigation(navigator: &Navigator) -> Option<NavVm> {
    let (position, total) = navigator.position()?;
    let current = navigator.current()?.to_string();
    let image_src = navigator.current_path()?.display().to_string();
    let names = navigator
        .images()?
        .names()
        .iter()
        .map(ToString::to_string)
        .collect();
    Some(NavVm {
        position_label: format!("Image {position} / {total}"),
        current,
        image_src,
        names,
        can_previous: position > 1,
        can_next: position < total,
    })
}
