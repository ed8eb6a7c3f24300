#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::core::spawn_forever;
use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;

use imagier_core::model::{ChatMessage, DataUrl};

use crate::app::Phase;
use crate::context::AppContext;
use crate::store::SessionStore;
use crate::vm::{UploadVm, identification_patch};

/// Read the first file of a selection or drop into memory.
pub(super) async fn read_first_file(files: Vec<FileData>) -> Option<(String, Vec<u8>)> {
    let file = files.into_iter().next()?;
    let name = file.name();
    let bytes = file.read_bytes().await.ok()?;
    Some((name, bytes.to_vec()))
}

/// Upload flow state owned by the phase controller so an in-flight
/// identification survives a tab switch.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct UploadSlot {
    pub vm: Signal<UploadVm>,
}

/// Issue the identify request. The completion is detached from the
/// calling scope: success commits the word pair and enters Chat, and a
/// failure lands on the slot, even when the upload view has been
/// unmounted in the meantime.
pub(crate) fn spawn_identify(
    ctx: &AppContext,
    store: SessionStore,
    phase: Signal<Phase>,
    slot: UploadSlot,
    image: DataUrl,
) {
    let tutor = ctx.tutor();
    let clock = ctx.clock();
    spawn_forever(async move {
        match tutor.identify(&image).await {
            Ok(identification) => {
                let announcement = ChatMessage::word_detected(
                    &identification.object,
                    &identification.french_word,
                    clock.now(),
                );
                let mut store = store;
                store.apply(identification_patch(identification, image));
                store.push_message(announcement);
                let mut phase = phase;
                phase.set(Phase::Chat);
            }
            Err(_) => {
                let mut vm = slot.vm;
                vm.with_mut(UploadVm::fail_identify);
            }
        }
    });
}

#[component]
pub fn UploadView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<SessionStore>();
    let phase = use_context::<Signal<Phase>>();
    let slot = use_context::<UploadSlot>();
    let mut vm = slot.vm;

    let identifying = vm.read().is_identifying();
    let preview = vm.read().preview().cloned();
    let error = vm.read().error();

    let on_identify = use_callback(move |()| {
        let mut vm = slot.vm;
        let Some(image) = vm.with_mut(UploadVm::begin_identify) else {
            return;
        };
        spawn_identify(&ctx, store, phase, slot, image);
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<UploadTestHandles>() {
                handles.register(on_identify);
            }
        }
    }

    rsx! {
        div { class: "image-upload-container",
            h2 { "Upload an Image to Learn French" }
            p { "Take a photo or upload an image of an object to learn its French name and usage" }

            if let Some(draft) = preview {
                div { class: "upload-preview",
                    img {
                        class: "preview-image",
                        alt: "Preview",
                        src: "{draft.data_url}",
                    }
                    div { class: "action-buttons",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            disabled: identifying,
                            onclick: move |_| {
                                let mut vm = vm;
                                vm.with_mut(UploadVm::clear);
                            },
                            "Clear"
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: identifying,
                            onclick: move |_| on_identify.call(()),
                            if identifying { "Identifying..." } else { "Identify Object" }
                        }
                    }
                }
            } else {
                div {
                    class: "upload-area",
                    ondragover: move |evt| evt.prevent_default(),
                    ondrop: move |evt| {
                        evt.prevent_default();
                        let files = evt.files();
                        spawn(async move {
                            if let Some((name, bytes)) = read_first_file(files).await {
                                let mut vm = vm;
                                vm.with_mut(|vm| vm.drop_file(&name, &bytes));
                            }
                        });
                    },
                    span { class: "upload-icon", "📷" }
                    p { class: "upload-text", "Click to upload or drag & drop an image here" }
                    p { class: "upload-text-small", "Supports JPG, PNG" }
                    label { class: "upload-picker",
                        "Choose a file"
                        input {
                            class: "hidden-file-input",
                            r#type: "file",
                            accept: "image/*",
                            onchange: move |evt| {
                                let files = evt.files();
                                spawn(async move {
                                    if let Some((name, bytes)) = read_first_file(files).await {
                                        let mut vm = vm;
                                        vm.with_mut(|vm| vm.pick(&name, &bytes));
                                    }
                                });
                            },
                        }
                    }
                }
            }

            if identifying {
                div { class: "loading-spinner" }
            }

            if let Some(message) = error {
                div { class: "error-message", "{message}" }
            }

            div { class: "instructions",
                h3 { "How it works:" }
                ol {
                    li { "Upload a clear image of a single object" }
                    li { "Our AI will identify the object and translate it to French" }
                    li { "Learn the French word and example sentences" }
                    li { "Chat with our AI tutor to practice your French" }
                    li { "Test your knowledge with fun quizzes" }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct UploadTestHandles {
    identify: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl UploadTestHandles {
    pub(crate) fn register(&self, identify: Callback<()>) {
        *self.identify.borrow_mut() = Some(identify);
    }

    pub(crate) fn identify(&self) -> Callback<()> {
        (*self.identify.borrow()).expect("upload identify registered")
    }
}
