use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who spoke a chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Tutor,
}

/// One turn in the conversation. Append-only: once pushed onto the
/// transcript a message is never mutated or reordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            sent_at,
        }
    }

    #[must_use]
    pub fn tutor(content: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Tutor,
            content: content.into(),
            sent_at,
        }
    }

    /// Synthesized tutor turn announcing a successful identification.
    #[must_use]
    pub fn word_detected(english: &str, french: &str, sent_at: DateTime<Utc>) -> Self {
        Self::tutor(
            format!(
                "The object in your image is \"{english}\" which in French is \"{french}\"."
            ),
            sent_at,
        )
    }

    /// Fallback tutor turn appended when a chat request fails, so the
    /// transcript keeps its user/tutor pairing.
    #[must_use]
    pub fn apology(sent_at: DateTime<Utc>) -> Self {
        Self::tutor(
            "Sorry, I had trouble understanding. Could you try again?",
            sent_at,
        )
    }
}

/// A French sentence with its English rendering, shown in presentation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExampleSentence {
    pub french: String,
    pub english: String,
}

/// Proficiency level carried in the learning context and used as quiz
/// difficulty. Wire values are the lowercase names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown level: {raw}")]
pub struct LevelParseError {
    pub raw: String,
}

impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(LevelParseError {
                raw: value.to_string(),
            }),
        }
    }
}

/// Settings the tutor endpoint receives with every chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LearningContext {
    pub learning_french: bool,
    pub level: Level,
}

impl Default for LearningContext {
    fn default() -> Self {
        Self {
            learning_french: true,
            level: Level::Beginner,
        }
    }
}

/// A self-describing `data:` URL holding image bytes. Raw bytes are
/// base64-encoded as-is; no resizing or compression happens client-side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    #[must_use]
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{media_type};base64,{}", BASE64.encode(bytes)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when the media type names an image. Used to reject non-image
/// drag-drops before any work happens.
#[must_use]
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Media type derived from a file name extension. Unknown extensions fall
/// back to an opaque binary type, which the drop path then rejects.
#[must_use]
pub fn media_type_for_file(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// The mutable record of one learning interaction. Lives for one app
/// launch; flows write into it through [`SessionPatch`], nothing else
/// reads it except to render and to build outgoing requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub english_word: String,
    pub french_word: String,
    pub examples: Vec<ExampleSentence>,
    pub image_data: Option<DataUrl>,
    pub chat_history: Vec<ChatMessage>,
    pub context: LearningContext,
}

impl Session {
    #[must_use]
    pub fn with_context(context: LearningContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Gating predicate: the quiz phase is reachable only once a French
    /// word has been identified.
    #[must_use]
    pub fn has_french_word(&self) -> bool {
        !self.french_word.is_empty()
    }

    /// Shallow merge: provided fields overwrite, absent fields stay.
    /// `chat_history` and `examples` are replaced wholesale, so a caller
    /// appending must pass the complete new sequence. No validation.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(english_word) = patch.english_word {
            self.english_word = english_word;
        }
        if let Some(french_word) = patch.french_word {
            self.french_word = french_word;
        }
        if let Some(examples) = patch.examples {
            self.examples = examples;
        }
        if let Some(image_data) = patch.image_data {
            self.image_data = Some(image_data);
        }
        if let Some(chat_history) = patch.chat_history {
            self.chat_history = chat_history;
        }
        if let Some(context) = patch.context {
            self.context = context;
        }
    }

    /// Append a turn to the transcript in place. Callers holding a stale
    /// snapshot should prefer this over `apply` with a rebuilt history.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
    }
}

/// Partial overlay for [`Session::apply`]. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub english_word: Option<String>,
    pub french_word: Option<String>,
    pub examples: Option<Vec<ExampleSentence>>,
    pub image_data: Option<DataUrl>,
    pub chat_history: Option<Vec<ChatMessage>>,
    pub context: Option<LearningContext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn apply_overlays_only_provided_fields() {
        let mut session = Session::default();
        session.apply(SessionPatch {
            english_word: Some("cat".into()),
            french_word: Some("chat".into()),
            ..SessionPatch::default()
        });

        assert_eq!(session.english_word, "cat");
        assert_eq!(session.french_word, "chat");
        assert!(session.examples.is_empty());
        assert!(session.image_data.is_none());

        session.apply(SessionPatch {
            examples: Some(vec![ExampleSentence {
                french: "Le chat dort.".into(),
                english: "The cat sleeps.".into(),
            }]),
            ..SessionPatch::default()
        });

        // Earlier fields survive an unrelated patch.
        assert_eq!(session.french_word, "chat");
        assert_eq!(session.examples.len(), 1);
    }

    #[test]
    fn apply_replaces_sequences_wholesale() {
        let now = fixed_now();
        let mut session = Session::default();
        session.push_message(ChatMessage::user("bonjour", now));

        session.apply(SessionPatch {
            chat_history: Some(vec![ChatMessage::tutor("salut", now)]),
            ..SessionPatch::default()
        });

        assert_eq!(session.chat_history.len(), 1);
        assert_eq!(session.chat_history[0].sender, Sender::Tutor);
    }

    #[test]
    fn gating_requires_non_empty_french_word() {
        let mut session = Session::default();
        assert!(!session.has_french_word());

        session.apply(SessionPatch {
            french_word: Some("chat".into()),
            ..SessionPatch::default()
        });
        assert!(session.has_french_word());
    }

    #[test]
    fn word_detected_message_names_both_words() {
        let message = ChatMessage::word_detected("cat", "chat", fixed_now());
        assert_eq!(message.sender, Sender::Tutor);
        assert!(message.content.contains("cat"));
        assert!(message.content.contains("chat"));
    }

    #[test]
    fn data_url_encodes_media_type_and_payload() {
        let url = DataUrl::encode("image/png", b"abc");
        assert_eq!(url.as_str(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn media_type_detection() {
        assert_eq!(media_type_for_file("photo.JPG"), "image/jpeg");
        assert_eq!(media_type_for_file("photo.png"), "image/png");
        assert_eq!(media_type_for_file("notes.txt"), "application/octet-stream");
        assert!(is_image_media_type("image/webp"));
        assert!(!is_image_media_type("application/pdf"));
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("Beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!(" advanced ".parse::<Level>().unwrap(), Level::Advanced);
        assert!("expert".parse::<Level>().is_err());
        assert_eq!(Level::Intermediate.as_str(), "intermediate");
    }
}
