use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{ExportView, SurveyView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", SurveyView)] Survey {},
        #[route("/export", ExportView)] Export {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            nav { class: "topbar",
                h1 { "Panoramic Image Evaluation" }
                ul {
                    li { Link { to: Route::Survey {}, "Evaluate" } }
                    li { Link { to: Route::Export {}, "Export" } }
                }
            }
            Outlet::<Route> {}
        }
    }
}
