use dioxus::prelude::*;

use survey_core::model::{
    RespondentMetadata, SPECIALIZATION_OPTIONS, WEEKLY_CASES_OPTIONS, YEARS_EXPERIENCE_OPTIONS,
};

use crate::context::AppContext;
use crate::vm::{
    ControlVm, FormSectionVm, NavVm, QuestionVm, RespondentField, SurveyIntent, SurveyStatus,
    SurveyVm,
};

#[component]
pub fn SurveyView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.survey_service();
    let default_dir = ctx.default_image_dir();

    let mut vm = use_signal(move || Some(SurveyVm::start(&service, &default_dir)));
    let mut submitting = use_signal(|| false);

    let on_intent = use_callback(move |intent: SurveyIntent| {
        if let Some(vm) = vm.write().as_mut() {
            vm.apply(intent);
        }
    });

    let on_submit = move |_| {
        if submitting() {
            return;
        }
        submitting.set(true);
        spawn(async move {
            let local_vm = {
                let mut guard = vm.write();
                guard.take()
            };
            let Some(mut vm_value) = local_vm else {
                submitting.set(false);
                return;
            };

            vm_value.submit().await;

            // The session goes back even when the append failed, answers intact.
            {
                let mut guard = vm.write();
                *guard = Some(vm_value);
            }
            submitting.set(false);
        });
    };

    let snapshot = vm.read();
    let Some(current) = snapshot.as_ref() else {
        return rsx! {
            div { class: "survey",
                p { "Saving..." }
            }
        };
    };
    let nav = current.navigation();
    let sections = current.form();
    let respondent = current.respondent().clone();
    let blocking = current.blocking_error().cloned();
    let status = current.status().clone();
    let directory = current.directory_input().to_string();
    let log_location = current.log_location();
    drop(snapshot);

    rsx! {
        div { class: "survey",
            SurveySidebar {
                directory,
                nav: nav.clone(),
                log_location,
                on_intent,
            }
            main { class: "content",
                match (blocking, nav) {
                    (Some(err), _) => rsx! {
                        div { class: "notice notice--error", "{err.message()}" }
                        p { class: "muted", "Choose another image directory in the sidebar." }
                    },
                    (None, None) => rsx! {
                        p { class: "muted", "No image directory is loaded." }
                    },
                    (None, Some(nav)) => rsx! {
                        h2 { "Current Image: {nav.current}" }
                        div { class: "image-frame",
                            img { src: "{nav.image_src}", alt: "{nav.current}" }
                        }
                        RespondentSection { respondent, on_intent }
                        for section in sections {
                            FormSection { key: "{section.title}", section, on_intent }
                        }
                        div { class: "form-actions",
                            button {
                                id: "survey-submit",
                                r#type: "button",
                                disabled: submitting(),
                                onclick: on_submit,
                                "Submit evaluation for this image"
                            }
                        }
                        StatusNotice { status }
                    },
                }
            }
        }
    }
}

#[component]
fn SurveySidebar(
    directory: String,
    nav: Option<NavVm>,
    log_location: String,
    on_intent: Callback<SurveyIntent>,
) -> Element {
    let mut dir_input = use_signal(|| directory.clone());

    rsx! {
        aside { class: "sidebar",
            h3 { "Image set" }
            label { r#for: "image-dir", "Image directory" }
            input {
                id: "image-dir",
                r#type: "text",
                value: "{dir_input}",
                oninput: move |evt| dir_input.set(evt.value()),
            }
            div { class: "nav-buttons",
                button {
                    r#type: "button",
                    onclick: move |_| on_intent.call(SurveyIntent::OpenDirectory(dir_input())),
                    "Open"
                }
                button {
                    r#type: "button",
                    onclick: move |_| on_intent.call(SurveyIntent::Refresh),
                    "Reload"
                }
            }
            if let Some(nav) = nav {
                div { class: "nav-buttons",
                    button {
                        id: "nav-previous",
                        r#type: "button",
                        disabled: !nav.can_previous,
                        onclick: move |_| on_intent.call(SurveyIntent::Previous),
                        "⬅️ Previous"
                    }
                    button {
                        id: "nav-next",
                        r#type: "button",
                        disabled: !nav.can_next,
                        onclick: move |_| on_intent.call(SurveyIntent::Next),
                        "Next ➡️"
                    }
                }
                p { class: "position", "{nav.position_label}" }
                label { r#for: "jump-to", "Jump to image" }
                select {
                    id: "jump-to",
                    onchange: move |evt| on_intent.call(SurveyIntent::JumpTo(evt.value())),
                    for name in nav.names.iter().cloned() {
                        option {
                            key: "{name}",
                            value: "{name}",
                            selected: name == nav.current,
                            "{name}"
                        }
                    }
                }
            }
            p { class: "muted", "Responses are saved to: {log_location}" }
        }
    }
}

#[component]
fn RespondentSection(respondent: RespondentMetadata, on_intent: Callback<SurveyIntent>) -> Element {
    let set = move |field: RespondentField| {
        move |evt: FormEvent| on_intent.call(SurveyIntent::SetRespondent { field, value: evt.value() })
    };

    rsx! {
        section { class: "form-section",
            h3 { "Section 1 – Respondent Information" }
            p { class: "muted", "All fields are optional." }
            div { class: "question",
                label { "Name " }
                input { r#type: "text", value: "{respondent.name}", oninput: set(RespondentField::Name) }
            }
            div { class: "question",
                label { "Clinic / institution " }
                input { r#type: "text", value: "{respondent.clinic}", oninput: set(RespondentField::Clinic) }
            }
            ChoiceSelect {
                label: "Specialization",
                options: SPECIALIZATION_OPTIONS,
                current: respondent.specialization.clone(),
                on_change: move |value| on_intent.call(SurveyIntent::SetRespondent {
                    field: RespondentField::Specialization,
                    value,
                }),
            }
            ChoiceSelect {
                label: "Years of clinical experience",
                options: YEARS_EXPERIENCE_OPTIONS,
                current: respondent.years_experience.clone(),
                on_change: move |value| on_intent.call(SurveyIntent::SetRespondent {
                    field: RespondentField::YearsExperience,
                    value,
                }),
            }
            ChoiceSelect {
                label: "Average panoramic cases per week",
                options: WEEKLY_CASES_OPTIONS,
                current: respondent.avg_pano_cases_per_week.clone(),
                on_change: move |value| on_intent.call(SurveyIntent::SetRespondent {
                    field: RespondentField::WeeklyCases,
                    value,
                }),
            }
        }
    }
}

#[component]
fn ChoiceSelect(
    label: &'static str,
    options: &'static [&'static str],
    current: String,
    on_change: Callback<String>,
) -> Element {
    rsx! {
        div { class: "question",
            label { "{label} " }
            select {
                onchange: move |evt| on_change.call(evt.value()),
                option { value: "", selected: current.is_empty(), "—" }
                for opt in options.iter().copied() {
                    option { key: "{opt}", value: "{opt}", selected: current == opt, "{opt}" }
                }
            }
        }
    }
}

#[component]
fn FormSection(section: FormSectionVm, on_intent: Callback<SurveyIntent>) -> Element {
    rsx! {
        section { class: "form-section",
            h3 { "{section.title}" }
            if let Some(hint) = section.hint {
                p { class: "muted", "{hint}" }
            }
            for question in section.questions {
                QuestionField { key: "{question.key}", question, on_intent }
            }
        }
    }
}

#[component]
fn QuestionField(question: QuestionVm, on_intent: Callback<SurveyIntent>) -> Element {
    let key = question.key;
    rsx! {
        div { class: "question", id: "question-{key}",
            p { class: "prompt", "{question.prompt}" }
            match question.control {
                ControlVm::Likert { scale, selected } => rsx! {
                    div { class: "likert",
                        for score in scale {
                            label { key: "{score}",
                                input {
                                    r#type: "radio",
                                    name: "{key}",
                                    value: "{score}",
                                    checked: selected == Some(score),
                                    onchange: move |_| on_intent.call(SurveyIntent::SetLikert { key, score }),
                                }
                                "{score}"
                            }
                        }
                    }
                },
                ControlVm::Radio { options } => rsx! {
                    div { class: "choices",
                        for opt in options {
                            label { key: "{opt.label}",
                                input {
                                    r#type: "radio",
                                    name: "{key}",
                                    value: "{opt.label}",
                                    checked: opt.selected,
                                    onchange: move |_| on_intent.call(SurveyIntent::SetChoice {
                                        key,
                                        label: opt.label.to_string(),
                                    }),
                                }
                                "{opt.label}"
                            }
                        }
                    }
                },
                ControlVm::Checkboxes { options } => rsx! {
                    div { class: "choices",
                        for opt in options {
                            label { key: "{opt.label}",
                                input {
                                    r#type: "checkbox",
                                    value: "{opt.label}",
                                    checked: opt.selected,
                                    onchange: move |_| on_intent.call(SurveyIntent::ToggleOption {
                                        key,
                                        label: opt.label.to_string(),
                                    }),
                                }
                                "{opt.label}"
                            }
                        }
                    }
                },
                ControlVm::TextArea { value } => rsx! {
                    textarea {
                        value: "{value}",
                        oninput: move |evt| on_intent.call(SurveyIntent::SetText { key, text: evt.value() }),
                    }
                },
            }
        }
    }
}

#[component]
fn StatusNotice(status: SurveyStatus) -> Element {
    match status {
        SurveyStatus::Idle => rsx! {},
        SurveyStatus::Saved { image, location } => rsx! {
            div { class: "notice notice--ok",
                "Evaluation saved for {image} to {location}."
            }
        },
        SurveyStatus::Failed(err) => rsx! {
            div { class: "notice notice--error", "{err.message()}" }
        },
    }
}
