use std::time::Duration;

use dioxus::prelude::*;

use imagier_core::model::{AnswerOutcome, Level, QuizAttempt, score_message};

use crate::app::Phase;
use crate::context::AppContext;
use crate::store::SessionStore;
use crate::vm::{ERR_QUIZ_LOAD, OptionDisplay, QuizVm, option_display};

/// Quiz state owned by the phase controller so the reload policy, not the
/// view's lifetime, decides when an attempt is discarded.
#[derive(Clone, Copy, PartialEq)]
pub struct QuizSlot {
    pub vm: Signal<QuizVm>,
    pub word: Signal<String>,
}

/// Fetch a question set into the slot. Stamped with a ticket: if another
/// load starts while this one is in flight, the stale completion is
/// dropped instead of overwriting the fresher state.
pub(crate) fn spawn_quiz_load(ctx: &AppContext, slot: QuizSlot, word: String, level: Level) {
    let sequencer = ctx.quiz_requests();
    let ticket = sequencer.begin();
    let tutor = ctx.tutor();
    let mut vm = slot.vm;
    vm.set(QuizVm::Loading);
    spawn(async move {
        let result = tutor.fetch_quiz(&word, level).await;
        if !sequencer.is_current(ticket) {
            return;
        }
        let mut vm = vm;
        match result {
            Ok(questions) => vm.set(QuizVm::from_questions(questions)),
            Err(_) => vm.set(QuizVm::Failed),
        }
    });
}

fn option_class(display: OptionDisplay, celebrating: bool) -> &'static str {
    match display {
        OptionDisplay::Plain => "option-item",
        OptionDisplay::Selected => "option-item selected",
        OptionDisplay::Incorrect => "option-item incorrect",
        OptionDisplay::Correct => {
            if celebrating {
                "option-item correct celebrate"
            } else {
                "option-item correct"
            }
        }
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<SessionStore>();
    let phase = use_context::<Signal<Phase>>();
    let slot = use_context::<QuizSlot>();
    let mut celebrate = use_signal(|| false);

    let word = slot.word.read().clone();
    let state = slot.vm.read().clone();

    match state {
        QuizVm::Idle | QuizVm::Loading => rsx! {
            div { class: "quiz-loading",
                div { class: "loading-spinner" }
                p { "Preparing your French quiz..." }
            }
        },
        QuizVm::Failed => rsx! {
            div { class: "quiz-error",
                p { "{ERR_QUIZ_LOAD}" }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let level = store.peek().context.level;
                        let word = slot.word.peek().clone();
                        spawn_quiz_load(&ctx, slot, word, level);
                    },
                    "Try Again"
                }
            }
        },
        QuizVm::Empty => rsx! {
            div { class: "quiz-empty",
                p { "No quiz questions available. Please try a different word." }
            }
        },
        QuizVm::Ready(attempt) if attempt.is_completed() => rsx! {
            div { class: "quiz-results",
                h2 { "Quiz Completed!" }
                div { class: "results-score", "{attempt.score()} / {attempt.len()}" }
                p { class: "results-message", "{score_message(attempt.score(), attempt.len())}" }

                div { class: "learn-more",
                    h3 { "Keep Learning \"{word}\"" }
                    p { "Continue practicing to master this and other French words!" }
                }

                div { class: "results-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut vm = slot.vm;
                            vm.with_mut(|vm| {
                                if let QuizVm::Ready(attempt) = vm {
                                    attempt.restart_shuffled();
                                }
                            });
                        },
                        "Try Again"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut phase = phase;
                            phase.set(Phase::Upload);
                        },
                        "New Word"
                    }
                }
            }
        },
        QuizVm::Ready(attempt) => rsx! {
            { render_question(attempt, word, slot, celebrate) }
        },
    }
}

fn render_question(
    attempt: QuizAttempt,
    word: String,
    slot: QuizSlot,
    mut celebrate: Signal<bool>,
) -> Element {
    let Some(question) = attempt.current_question().cloned() else {
        return rsx! {};
    };
    let answered = attempt.is_answered();
    let number = attempt.current_index() + 1;
    let total = attempt.len();
    let progress_width = attempt.current_index() * 100 / total;
    let celebrating = celebrate();

    rsx! {
        div { class: "quiz-container",
            div { class: "quiz-header",
                h2 { "Test Your French" }
                span { class: "word-highlight", "{word}" }
                p { "Complete the quiz to practice your French vocabulary" }
            }

            div { class: "quiz-progress",
                span { "Question {number} of {total}" }
                div { class: "progress-bar",
                    div {
                        class: "progress-fill",
                        style: "width: {progress_width}%",
                    }
                }
                span { "Score: {attempt.score()}" }
            }

            div { class: "quiz-question",
                p { class: "question-text", "{question.text()}" }

                ul { class: "options-list",
                    for (index, option) in question.options().iter().enumerate() {
                        li {
                            key: "{index}",
                            class: option_class(option_display(&attempt, index), celebrating),
                            onclick: move |_| {
                                let mut vm = slot.vm;
                                let outcome = vm.with_mut(|vm| match vm {
                                    QuizVm::Ready(attempt) => attempt.select_option(index),
                                    _ => None,
                                });
                                if outcome == Some(AnswerOutcome::Correct) {
                                    let mut celebrate = celebrate;
                                    celebrate.set(true);
                                    spawn(async move {
                                        tokio::time::sleep(Duration::from_millis(1000)).await;
                                        let mut celebrate = celebrate;
                                        celebrate.set(false);
                                    });
                                }
                            },
                            "{option}"
                        }
                    }
                }

                if answered {
                    div { class: "explanation",
                        p { "{question.explanation()}" }
                    }
                }
            }

            if answered {
                div { class: "quiz-actions",
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| {
                            celebrate.set(false);
                            let mut vm = slot.vm;
                            vm.with_mut(|vm| {
                                if let QuizVm::Ready(attempt) = vm {
                                    attempt.advance();
                                }
                            });
                        },
                        if attempt.is_last_question() { "Finish Quiz" } else { "Next Question" }
                    }
                }
            }
        }
    }
}
