mod quiz;
mod session;

pub use quiz::{
    AnswerOutcome, Question, QuizAttempt, QuizReloadPolicy, score_message,
};
pub use session::{
    ChatMessage, DataUrl, ExampleSentence, LearningContext, Level, LevelParseError, Sender,
    Session, SessionPatch, is_image_media_type, media_type_for_file,
};
