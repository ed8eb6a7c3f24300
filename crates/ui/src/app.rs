#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;

use imagier_core::model::Session;

use crate::context::AppContext;
use crate::store::SessionStore;
use crate::views::chat::ChatSlot;
use crate::views::quiz::{QuizSlot, spawn_quiz_load};
use crate::views::upload::UploadSlot;
use crate::views::{ChatView, QuizView, UploadView};
use crate::vm::{ChatComposer, QuizVm, UploadVm, needs_reload};

/// The three mutually exclusive flows. Tabs, not routes: gating and
/// automatic transitions don't fit a URL-driven navigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Chat,
    Quiz,
}

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let initial_context = ctx.learning_context();

    let store = SessionStore::new(use_signal(move || Session::with_context(initial_context)));
    use_context_provider(|| store);

    let mut phase = use_signal(|| Phase::Upload);
    use_context_provider(|| phase);

    // Flow state lives above the conditional render. The views unmount on
    // every tab switch; their in-flight requests and error banners must
    // not, and for the quiz the reload policy alone decides whether
    // leaving the phase discards the attempt.
    let upload_slot = UploadSlot {
        vm: use_signal(UploadVm::new),
    };
    use_context_provider(|| upload_slot);
    let chat_slot = ChatSlot {
        composer: use_signal(ChatComposer::default),
        banner: use_signal(|| None),
    };
    use_context_provider(|| chat_slot);
    let quiz_slot = QuizSlot {
        vm: use_signal(QuizVm::default),
        word: use_signal(String::new),
    };
    use_context_provider(|| quiz_slot);

    // Entering the quiz phase (re)initializes the engine with the current
    // word and difficulty. Session reads are untracked on purpose: a late
    // chat reply must not re-trigger a load.
    let ctx_for_effect = ctx.clone();
    use_effect(move || {
        if phase() != Phase::Quiz {
            return;
        }
        let session = store.peek();
        let mut slot = quiz_slot;
        if needs_reload(
            ctx_for_effect.quiz_reload_policy(),
            &slot.word.peek(),
            &session.french_word,
            &slot.vm.peek(),
        ) {
            slot.word.set(session.french_word.clone());
            spawn_quiz_load(
                &ctx_for_effect,
                quiz_slot,
                session.french_word,
                session.context.level,
            );
        }
    });

    // A click on the already-active tab is a no-op; re-setting the phase
    // would re-run the entry effect and discard a running attempt.
    let select_quiz_tab = use_callback(move |()| {
        let mut phase = phase;
        if *phase.peek() != Phase::Quiz {
            phase.set(Phase::Quiz);
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<AppTestHandles>() {
                handles.register(store, phase, quiz_slot, select_quiz_tab);
            }
        }
    }

    let session = store.snapshot();
    let quiz_enabled = session.has_french_word();
    let current = phase();

    let tab_class = move |tab: Phase| {
        if current == tab {
            "tab-button active"
        } else {
            "tab-button"
        }
    };

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Imagier" }

        div { class: "app-container",
            header { class: "app-header",
                h1 { "🇫🇷 French Learning Adventure" }
                p { "Upload images, chat in French, take quizzes, and learn together!" }
            }

            div { class: "tab-navigation",
                button {
                    class: tab_class(Phase::Upload),
                    r#type: "button",
                    onclick: move |_| {
                        let mut phase = phase;
                        if *phase.peek() != Phase::Upload {
                            phase.set(Phase::Upload);
                        }
                    },
                    span { class: "tab-icon", "📷" }
                    " Upload Image"
                }
                button {
                    class: tab_class(Phase::Chat),
                    r#type: "button",
                    onclick: move |_| {
                        let mut phase = phase;
                        if *phase.peek() != Phase::Chat {
                            phase.set(Phase::Chat);
                        }
                    },
                    span { class: "tab-icon", "💬" }
                    " Chat"
                }
                button {
                    class: tab_class(Phase::Quiz),
                    r#type: "button",
                    disabled: !quiz_enabled,
                    onclick: move |_| select_quiz_tab.call(()),
                    span { class: "tab-icon", "🎮" }
                    " Quiz"
                }
            }

            main { class: "content-area",
                match current {
                    Phase::Upload => rsx! { UploadView {} },
                    Phase::Chat => rsx! { ChatView {} },
                    Phase::Quiz => rsx! { QuizView {} },
                }
            }

            footer { class: "app-footer",
                p { "Learn French one picture at a time." }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct AppTestHandles {
    store: Rc<RefCell<Option<SessionStore>>>,
    phase: Rc<RefCell<Option<Signal<Phase>>>>,
    quiz: Rc<RefCell<Option<QuizSlot>>>,
    select_quiz_tab: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl AppTestHandles {
    pub(crate) fn register(
        &self,
        store: SessionStore,
        phase: Signal<Phase>,
        quiz: QuizSlot,
        select_quiz_tab: Callback<()>,
    ) {
        *self.store.borrow_mut() = Some(store);
        *self.phase.borrow_mut() = Some(phase);
        *self.quiz.borrow_mut() = Some(quiz);
        *self.select_quiz_tab.borrow_mut() = Some(select_quiz_tab);
    }

    pub(crate) fn store(&self) -> SessionStore {
        (*self.store.borrow()).expect("app store registered")
    }

    pub(crate) fn phase(&self) -> Signal<Phase> {
        (*self.phase.borrow()).expect("app phase registered")
    }

    pub(crate) fn quiz(&self) -> QuizSlot {
        (*self.quiz.borrow()).expect("app quiz slot registered")
    }

    pub(crate) fn select_quiz_tab(&self) -> Callback<()> {
        (*self.select_quiz_tab.borrow()).expect("quiz tab handler registered")
    }
}
