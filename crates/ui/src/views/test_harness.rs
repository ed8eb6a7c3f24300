use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;

use imagier_core::model::{LearningContext, QuizReloadPolicy, Session};
use imagier_core::time::{Clock, fixed_clock};
use services::{TutorConfig, TutorService};

use crate::app::{App, AppTestHandles, Phase};
use crate::context::{UiApp, build_app_context};
use crate::store::SessionStore;
use crate::views::chat::{ChatSlot, ChatTestHandles};
use crate::views::quiz::QuizSlot;
use crate::views::upload::{UploadSlot, UploadTestHandles};
use crate::views::{ChatView, UploadView};
use crate::vm::{ChatComposer, QuizVm, UploadVm};

/// No tutor endpoint is reachable during these tests; requests against the
/// base URL fail fast with a connection error.
struct TestApp {
    tutor: Arc<TutorService>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            tutor: Arc::new(TutorService::new(TutorConfig::new("http://127.0.0.1:9"))),
        }
    }
}

impl UiApp for TestApp {
    fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    fn clock(&self) -> Clock {
        fixed_clock()
    }

    fn learning_context(&self) -> LearningContext {
        LearningContext::default()
    }

    fn quiz_reload_policy(&self) -> QuizReloadPolicy {
        QuizReloadPolicy::AlwaysReload
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    WholeApp,
    Upload,
    Chat,
}

/// Handles a test can drive a mounted dom through, mirroring what a user
/// reaches via the rendered controls. Components register their callbacks
/// here; the harness registers its own surrounding state.
#[derive(Clone, Default)]
pub struct HarnessHandles {
    store: Rc<RefCell<Option<SessionStore>>>,
    phase: Rc<RefCell<Option<Signal<Phase>>>>,
    chat_slot: Rc<RefCell<Option<ChatSlot>>>,
    upload_slot: Rc<RefCell<Option<UploadSlot>>>,
    pub chat: ChatTestHandles,
    pub upload: UploadTestHandles,
    pub app: AppTestHandles,
}

impl HarnessHandles {
    pub fn store(&self) -> SessionStore {
        (*self.store.borrow()).expect("harness store registered")
    }

    pub fn phase(&self) -> Signal<Phase> {
        (*self.phase.borrow()).expect("harness phase registered")
    }

    pub fn chat_slot(&self) -> ChatSlot {
        (*self.chat_slot.borrow()).expect("harness chat slot registered")
    }

    pub fn upload_slot(&self) -> UploadSlot {
        (*self.upload_slot.borrow()).expect("harness upload slot registered")
    }

    fn register(
        &self,
        store: SessionStore,
        phase: Signal<Phase>,
        chat_slot: ChatSlot,
        upload_slot: UploadSlot,
    ) {
        *self.store.borrow_mut() = Some(store);
        *self.phase.borrow_mut() = Some(phase);
        *self.chat_slot.borrow_mut() = Some(chat_slot);
        *self.upload_slot.borrow_mut() = Some(upload_slot);
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    seed: Session,
    view: ViewKind,
    handles: HarnessHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarness(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = Arc::new(TestApp::new());
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.chat.clone());
    use_context_provider(|| props.handles.upload.clone());
    use_context_provider(|| props.handles.app.clone());

    // Single views get their surrounding state provided here; `WholeApp`
    // builds its own store, phase and slots internally. The views mount
    // only while the phase matches, so a phase change genuinely unmounts
    // them, as tab navigation does.
    let seed = props.seed.clone();
    let store = SessionStore::new(use_signal(move || seed.clone()));
    use_context_provider(|| store);
    let initial_phase = match props.view {
        ViewKind::Chat => Phase::Chat,
        _ => Phase::Upload,
    };
    let phase = use_signal(|| initial_phase);
    use_context_provider(|| phase);
    let chat_slot = ChatSlot {
        composer: use_signal(ChatComposer::default),
        banner: use_signal(|| None),
    };
    use_context_provider(|| chat_slot);
    let upload_slot = UploadSlot {
        vm: use_signal(UploadVm::new),
    };
    use_context_provider(|| upload_slot);
    let quiz_slot = QuizSlot {
        vm: use_signal(|| QuizVm::Idle),
        word: use_signal(String::new),
    };
    use_context_provider(|| quiz_slot);

    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        props.handles.register(store, phase, chat_slot, upload_slot);
    }

    match props.view {
        ViewKind::WholeApp => rsx! { App {} },
        ViewKind::Upload => {
            if phase() == Phase::Upload {
                rsx! { UploadView {} }
            } else {
                rsx! {}
            }
        }
        ViewKind::Chat => {
            if phase() == Phase::Chat {
                rsx! { ChatView {} }
            } else {
                rsx! {}
            }
        }
    }
}

pub fn setup_view_harness(view: ViewKind, seed: Session) -> VirtualDom {
    setup_view_harness_with_handles(view, seed).0
}

pub fn setup_view_harness_with_handles(
    view: ViewKind,
    seed: Session,
) -> (VirtualDom, HarnessHandles) {
    let handles = HarnessHandles::default();
    let mut dom = VirtualDom::new_with_props(
        ViewHarness,
        HarnessProps {
            seed,
            view,
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    (dom, handles)
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Let spawned work make progress, then flush the resulting renders.
pub async fn drive_async(dom: &mut VirtualDom) {
    let _ = tokio::time::timeout(Duration::from_millis(50), dom.wait_for_work()).await;
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn render_html(dom: &VirtualDom) -> String {
    dioxus_ssr::render(dom)
}
