//! Scripted flow tests: drive mounted views through their registered
//! callbacks and assert on the app-owned state they leave behind.

use dioxus::prelude::{ReadableExt, WritableExt};

use imagier_core::model::{Question, QuizAttempt, Sender, Session, SessionPatch};

use crate::app::Phase;
use crate::views::test_harness::{
    ViewKind, drive_async, drive_dom, setup_view_harness_with_handles,
};
use crate::vm::{ERR_IDENTIFY_FAILED, QuizVm};

#[tokio::test(flavor = "current_thread")]
async fn chat_send_settles_after_leaving_the_chat_tab() {
    let (mut dom, handles) = setup_view_harness_with_handles(ViewKind::Chat, Session::default());
    let slot = handles.chat_slot();
    let mut composer = slot.composer;
    composer.with_mut(|composer| composer.set_text("bonjour".into()));

    handles.chat.send().call(());
    drive_dom(&mut dom);

    // The user turn is committed before the request settles.
    assert_eq!(handles.store().peek().chat_history.len(), 1);

    // Leave the chat tab while the request is in flight; the view
    // unmounts but the completion keeps running.
    let mut phase = handles.phase();
    phase.set(Phase::Upload);
    drive_dom(&mut dom);

    for _ in 0..20 {
        drive_async(&mut dom).await;
        if handles.store().peek().chat_history.len() == 2 {
            break;
        }
    }

    let session = handles.store().peek();
    assert_eq!(session.chat_history.len(), 2, "transcript must stay paired");
    assert_eq!(session.chat_history[1].sender, Sender::Tutor);
    assert!(session.chat_history[1].content.contains("Sorry"));
    assert!(!slot.composer.peek().is_sending());
}

#[tokio::test(flavor = "current_thread")]
async fn identify_failure_lands_after_leaving_the_upload_tab() {
    let (mut dom, handles) = setup_view_harness_with_handles(ViewKind::Upload, Session::default());
    let slot = handles.upload_slot();
    let mut vm = slot.vm;
    vm.with_mut(|vm| vm.pick("cat.png", b"pixels"));

    handles.upload.identify().call(());
    drive_dom(&mut dom);
    assert!(slot.vm.peek().is_identifying());

    let mut phase = handles.phase();
    phase.set(Phase::Chat);
    drive_dom(&mut dom);

    for _ in 0..20 {
        drive_async(&mut dom).await;
        if !slot.vm.peek().is_identifying() {
            break;
        }
    }

    // The failure is recorded on app-owned state with the selection kept.
    assert_eq!(slot.vm.peek().error(), Some(ERR_IDENTIFY_FAILED));
    assert!(slot.vm.peek().preview().is_some());
}

#[tokio::test(flavor = "current_thread")]
async fn redundant_quiz_tab_click_keeps_the_running_attempt() {
    let (mut dom, handles) =
        setup_view_harness_with_handles(ViewKind::WholeApp, Session::default());
    let mut store = handles.app.store();
    store.apply(SessionPatch {
        english_word: Some("cat".into()),
        french_word: Some("chat".into()),
        ..SessionPatch::default()
    });
    drive_dom(&mut dom);

    handles.app.select_quiz_tab().call(());
    drive_dom(&mut dom);
    assert_eq!(*handles.app.phase().peek(), Phase::Quiz);

    // Stand in for a settled load with one answered question.
    let slot = handles.app.quiz();
    let question = Question::new(
        "What is \"chat\"?",
        vec!["cat".into(), "dog".into()],
        "cat",
        "",
    )
    .unwrap();
    let mut attempt = QuizAttempt::new(vec![question]);
    attempt.select_option(0);
    let mut vm = slot.vm;
    vm.set(QuizVm::Ready(attempt.clone()));
    let mut word = slot.word;
    word.set("chat".into());
    drive_dom(&mut dom);

    // Clicking the already-active tab must not re-enter the phase and
    // reload the quiz.
    handles.app.select_quiz_tab().call(());
    drive_dom(&mut dom);

    let state = slot.vm.peek().clone();
    let kept = state.attempt().expect("attempt still loaded");
    assert_eq!(kept.score(), 1);
    assert!(kept.is_answered());
}
