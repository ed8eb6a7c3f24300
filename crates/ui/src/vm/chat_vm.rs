use chrono::{DateTime, Utc};

use imagier_core::model::{ChatMessage, DataUrl, Session};
use services::{ChatContext, TutorError};

use crate::vm::upload_vm::ImageDraft;

pub const ERR_CHAT_FAILED: &str = "Error communicating with the tutor. Please try again.";

/// A turn handed to the network layer. Snapshot of the draft at send time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingTurn {
    pub message: String,
    pub image: Option<DataUrl>,
}

/// The in-progress input: draft text plus an optional attached image.
/// Deliberately not part of the session store; it lives with the phase
/// controller so the send lock survives a tab switch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatComposer {
    text: String,
    attachment: Option<ImageDraft>,
    sending: bool,
}

impl ChatComposer {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn attachment(&self) -> Option<&ImageDraft> {
        self.attachment.as_ref()
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn attach(&mut self, draft: ImageDraft) {
        self.attachment = Some(draft);
    }

    pub fn detach(&mut self) {
        self.attachment = None;
    }

    /// A turn needs text or an image, and only one request may be in
    /// flight at a time (the submit control mirrors this).
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.sending && (!self.text.trim().is_empty() || self.attachment.is_some())
    }

    /// Take a snapshot of the draft and lock the composer. The draft is
    /// *not* cleared here: it survives until the request settles so the
    /// user cannot double-submit and nothing is lost if sending fails.
    pub fn begin_send(&mut self) -> Option<OutgoingTurn> {
        if !self.can_send() {
            return None;
        }
        self.sending = true;
        Some(OutgoingTurn {
            message: self.text.clone(),
            image: self
                .attachment
                .as_ref()
                .map(|draft| draft.data_url.clone()),
        })
    }

    /// The request settled (success or failure): unlock and clear.
    pub fn finish_send(&mut self) {
        self.sending = false;
        self.text.clear();
        self.attachment = None;
    }
}

/// Context for an outgoing tutoring request: learning settings plus the
/// current word pair from the session.
#[must_use]
pub fn chat_context(session: &Session) -> ChatContext {
    ChatContext {
        learning: session.context,
        current_word: session.english_word.clone(),
        french_word: session.french_word.clone(),
    }
}

/// Turn a chat response into the tutor's transcript entry. A failure
/// becomes the fixed apology so the transcript keeps its user/tutor
/// pairing; the error banner is handled separately by the view.
#[must_use]
pub fn tutor_turn(result: Result<String, TutorError>, sent_at: DateTime<Utc>) -> ChatMessage {
    match result {
        Ok(content) => ChatMessage::tutor(content, sent_at),
        Err(_) => ChatMessage::apology(sent_at),
    }
}
