use imagier_core::model::{ChatMessage, ExampleSentence, Session, SessionPatch};
use imagier_core::time::fixed_now;

use super::test_harness::{ViewKind, render_html, setup_view_harness};

fn identified_session() -> Session {
    let mut session = Session::default();
    session.apply(SessionPatch {
        english_word: Some("cat".into()),
        french_word: Some("chat".into()),
        examples: Some(vec![ExampleSentence {
            french: "Le chat dort.".into(),
            english: "The cat sleeps.".into(),
        }]),
        ..SessionPatch::default()
    });
    session.push_message(ChatMessage::word_detected("cat", "chat", fixed_now()));
    session
}

#[test]
fn app_starts_in_upload_with_quiz_tab_gated() {
    let dom = setup_view_harness(ViewKind::WholeApp, Session::default());
    let html = render_html(&dom);

    assert!(html.contains("Upload an Image to Learn French"), "{html}");
    assert!(html.contains("Quiz"), "{html}");
    // No word identified yet: the quiz tab must be disabled.
    assert!(html.contains("disabled"), "{html}");
}

#[test]
fn upload_view_offers_picker_and_instructions() {
    let dom = setup_view_harness(ViewKind::Upload, Session::default());
    let html = render_html(&dom);

    assert!(html.contains("drag &amp; drop") || html.contains("drag & drop"), "{html}");
    assert!(html.contains("How it works:"), "{html}");
    assert!(html.contains("image/*"), "{html}");
}

#[test]
fn chat_view_greets_when_transcript_is_empty() {
    let dom = setup_view_harness(ViewKind::Chat, Session::default());
    let html = render_html(&dom);

    assert!(html.contains("Bonjour! I&#39;m your French language tutor")
        || html.contains("Bonjour! I'm your French language tutor"), "{html}");
    // No word known: no quiz shortcut.
    assert!(!html.contains("Practice with Quiz"), "{html}");
}

#[test]
fn chat_view_renders_transcript_examples_and_quiz_action() {
    let dom = setup_view_harness(ViewKind::Chat, identified_session());
    let html = render_html(&dom);

    assert!(html.contains("chat"), "{html}");
    assert!(html.contains("Le chat dort."), "{html}");
    assert!(html.contains("The cat sleeps."), "{html}");
    assert!(html.contains("Currently learning:"), "{html}");
    assert!(html.contains("Practice with Quiz"), "{html}");
}
