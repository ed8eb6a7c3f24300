#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;

use imagier_core::model::{ChatMessage, Sender};

use crate::app::Phase;
use crate::context::AppContext;
use crate::store::SessionStore;
use crate::views::upload::read_first_file;
use crate::vm::{
    ChatComposer, ERR_CHAT_FAILED, ImageDraft, OutgoingTurn, chat_context, format_clock_time,
    tutor_turn,
};

/// Chat flow state owned by the phase controller. The send lock and the
/// error banner must outlive the view, which unmounts on every tab
/// switch.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct ChatSlot {
    pub composer: Signal<ChatComposer>,
    pub banner: Signal<Option<&'static str>>,
}

/// Issue one chat turn: optimistic user append, then the request. The
/// completion is detached from the calling scope so a tab switch cannot
/// cancel it between the two appends; the transcript always keeps its
/// user/tutor pairing.
pub(crate) fn send_chat_turn(
    ctx: &AppContext,
    store: SessionStore,
    slot: ChatSlot,
    turn: OutgoingTurn,
) {
    let tutor = ctx.tutor();
    let clock = ctx.clock();
    let mut banner = slot.banner;
    banner.set(None);

    // The user turn shows before the request settles.
    let mut store = store;
    store.push_message(ChatMessage::user(turn.message.clone(), clock.now()));
    let context = chat_context(&store.peek());

    spawn_forever(async move {
        let result = tutor.chat(&turn.message, turn.image.as_ref(), &context).await;
        let mut banner = banner;
        if result.is_err() {
            banner.set(Some(ERR_CHAT_FAILED));
        }
        // Appends onto the latest transcript, never a stale copy.
        let mut store = store;
        store.push_message(tutor_turn(result, clock.now()));
        let mut composer = slot.composer;
        composer.with_mut(ChatComposer::finish_send);
    });
}

#[component]
pub fn ChatView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<SessionStore>();
    let phase = use_context::<Signal<Phase>>();
    let slot = use_context::<ChatSlot>();
    let mut composer = slot.composer;
    let banner = slot.banner;

    let session = store.snapshot();
    let sending = composer.read().is_sending();
    let can_send = composer.read().can_send();
    let draft_text = composer.read().text().to_string();
    let has_attachment = composer.read().attachment().is_some();

    let on_send = use_callback(move |()| {
        let mut composer = slot.composer;
        let Some(turn) = composer.with_mut(ChatComposer::begin_send) else {
            return;
        };
        send_chat_turn(&ctx, store, slot, turn);
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ChatTestHandles>() {
                handles.register(on_send);
            }
        }
    }

    rsx! {
        div { class: "chat-container",
            div { class: "chat-header",
                h2 { "French Language Tutor" }
                if session.has_french_word() {
                    div { class: "current-word",
                        "Currently learning: "
                        strong { "{session.french_word}" }
                        " ({session.english_word})"
                    }
                }
            }

            div { class: "chat-messages",
                if session.chat_history.is_empty() {
                    div { class: "message bot",
                        div { class: "message-content",
                            "Bonjour! I'm your French language tutor. How can I help you learn French today?"
                            if session.has_french_word() {
                                div {
                                    "I see you're learning the word \"{session.french_word}\" ({session.english_word}). "
                                    "Ask me anything about it!"
                                }
                            }
                        }
                    }
                }

                for (index, message) in session.chat_history.iter().enumerate() {
                    div {
                        key: "{index}",
                        class: if message.sender == Sender::User { "message user" } else { "message bot" },
                        div { class: "message-content", "{message.content}" }
                        div { class: "message-time", "{format_clock_time(message.sent_at)}" }
                    }
                }

                if sending {
                    div { class: "message bot loading",
                        div { class: "typing-indicator",
                            span {}
                            span {}
                            span {}
                        }
                    }
                }

                if let Some(message) = banner() {
                    div { class: "error-message", "{message}" }
                }
            }

            if !session.examples.is_empty() {
                div { class: "examples-container",
                    div { class: "examples-title", "Example Sentences:" }
                    for (index, example) in session.examples.iter().enumerate() {
                        div { key: "{index}", class: "example-item",
                            div { class: "french-text", "{example.french}" }
                            div { class: "english-text", "{example.english}" }
                        }
                    }
                }
            }

            div { class: "chat-input-form",
                div { class: "chat-input",
                    input {
                        r#type: "text",
                        placeholder: "Type your message...",
                        disabled: sending,
                        value: "{draft_text}",
                        oninput: move |evt| {
                            let mut composer = composer;
                            composer.with_mut(|composer| composer.set_text(evt.value()));
                        },
                    }
                    label { class: "btn-upload",
                        "📷"
                        input {
                            class: "hidden-file-input",
                            r#type: "file",
                            accept: "image/*",
                            disabled: sending,
                            onchange: move |evt| {
                                let files = evt.files();
                                spawn(async move {
                                    if let Some((name, bytes)) = read_first_file(files).await {
                                        let mut composer = composer;
                                        composer.with_mut(|composer| {
                                            composer.attach(ImageDraft::from_file(&name, &bytes));
                                        });
                                    }
                                });
                            },
                        }
                    }
                    button {
                        r#type: "button",
                        disabled: !can_send,
                        onclick: move |_| on_send.call(()),
                        "Send"
                    }
                }

                if has_attachment {
                    div { class: "image-preview",
                        span { "Image attached" }
                        button {
                            r#type: "button",
                            onclick: move |_| {
                                let mut composer = composer;
                                composer.with_mut(ChatComposer::detach);
                            },
                            "✕"
                        }
                    }
                }
            }

            div { class: "chat-actions",
                if session.has_french_word() {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut phase = phase;
                            phase.set(Phase::Quiz);
                        },
                        "Practice with Quiz"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ChatTestHandles {
    send: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl ChatTestHandles {
    pub(crate) fn register(&self, send: Callback<()>) {
        *self.send.borrow_mut() = Some(send);
    }

    pub(crate) fn send(&self) -> Callback<()> {
        (*self.send.borrow()).expect("chat send registered")
    }
}
