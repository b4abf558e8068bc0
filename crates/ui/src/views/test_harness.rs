use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{Clock, SurveyService};
use storage::{InMemoryEvaluationLog, Storage};
use survey_core::model::SurveySchema;
use survey_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::views::{ExportView, SurveyView};

#[derive(Clone)]
struct TestApp {
    survey_service: Arc<SurveyService>,
    image_dir: PathBuf,
}

impl UiApp for TestApp {
    fn survey_service(&self) -> Arc<SurveyService> {
        Arc::clone(&self.survey_service)
    }

    fn default_image_dir(&self) -> PathBuf {
        self.image_dir.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Survey,
    Export,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Survey => rsx! { SurveyView {} },
        ViewKind::Export => rsx! { ExportView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub log: InMemoryEvaluationLog,
    pub service: Arc<SurveyService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, image_dir: &Path) -> ViewHarness {
    let log = InMemoryEvaluationLog::new();
    let storage = Storage::new(Arc::new(log.clone()));
    let service = Arc::new(SurveyService::new(
        Clock::fixed(fixed_now()),
        SurveySchema::panoramic(),
        Arc::clone(&storage.evaluations),
    ));

    let app = Arc::new(TestApp {
        survey_service: Arc::clone(&service),
        image_dir: image_dir.to_path_buf(),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, log, service }
}
