use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

const STYLE: &str = r"
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2328; }
.topbar { display: flex; align-items: center; gap: 24px; padding: 8px 20px; border-bottom: 1px solid #d0d7de; }
.topbar h1 { font-size: 18px; margin: 0; }
.topbar ul { display: flex; gap: 16px; list-style: none; margin: 0; padding: 0; }
.survey { display: flex; min-height: calc(100vh - 50px); }
.sidebar { width: 280px; padding: 16px; border-right: 1px solid #d0d7de; display: flex; flex-direction: column; gap: 12px; }
.sidebar .nav-buttons { display: flex; gap: 8px; }
.content { flex: 1; padding: 16px 24px; overflow-y: auto; }
.image-frame img { max-width: 100%; border: 1px solid #d0d7de; }
.form-section { margin-top: 20px; }
.question { margin: 10px 0; }
.likert label, .choices label { margin-right: 12px; }
.notice { padding: 8px 12px; border-radius: 6px; }
.notice--ok { background: #dafbe1; }
.notice--error { background: #ffebe9; }
.muted { color: #656d76; font-size: 13px; }
textarea { width: 100%; min-height: 60px; }
pre.csv-preview { max-height: 320px; overflow: auto; background: #f6f8fa; padding: 8px; }
";

#[component]
pub fn App() -> Element {
    rsx! {
        style { {STYLE} }

        document::Title { "Panoramic Image Evaluation" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
