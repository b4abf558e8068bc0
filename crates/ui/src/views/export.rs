use dioxus::prelude::*;
use services::render_csv;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ExportVm, map_export};

#[component]
pub fn ExportView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.survey_service();

    let resource = use_resource(move || {
        let service = service.clone();
        async move {
            let records = service.export().await.map_err(|err| ViewError::from(&err))?;
            let csv = render_csv(&records);
            Ok(map_export(&records, csv, service.log_location()))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "content",
            h2 { "Export evaluations" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    ExportPanel { data }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn ExportPanel(data: ExportVm) -> Element {
    let mut target = use_signal(|| String::from("evaluations_export.csv"));
    let mut saved = use_signal(|| None::<Result<String, String>>);
    let csv = data.csv.clone();

    let on_save = move |_| {
        let path = target();
        let csv = csv.clone();
        spawn(async move {
            let result = tokio::fs::write(&path, csv.as_bytes())
                .await
                .map(|()| path.clone())
                .map_err(|err| format!("{path}: {err}"));
            saved.set(Some(result));
        });
    };

    rsx! {
        p { "{data.count_label()}" }
        p { class: "muted", "Source: {data.location}" }

        if !data.rows.is_empty() {
            table { class: "export-table",
                thead {
                    tr {
                        th { "Submitted" }
                        th { "Image" }
                        th { "Respondent" }
                        th { "Answered" }
                    }
                }
                tbody {
                    for (idx, row) in data.rows.iter().enumerate() {
                        tr { key: "{idx}",
                            td { "{row.timestamp}" }
                            td { "{row.image}" }
                            td { "{row.respondent}" }
                            td { "{row.answered} / {data.total_questions}" }
                        }
                    }
                }
            }

            h3 { "CSV" }
            pre { class: "csv-preview", "{data.csv}" }

            div { class: "export-save",
                input {
                    r#type: "text",
                    value: "{target}",
                    oninput: move |evt| target.set(evt.value()),
                }
                button { r#type: "button", onclick: on_save, "Save copy" }
            }
            match saved() {
                Some(Ok(path)) => rsx! {
                    div { class: "notice notice--ok", "Saved to {path}." }
                },
                Some(Err(reason)) => rsx! {
                    div { class: "notice notice--error", "Could not save: {reason}" }
                },
                None => rsx! {},
            }
        }
    }
}
