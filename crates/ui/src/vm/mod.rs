mod chat_vm;
mod quiz_vm;
mod time_fmt;
mod upload_vm;

pub use chat_vm::{ChatComposer, ERR_CHAT_FAILED, OutgoingTurn, chat_context, tutor_turn};
pub use quiz_vm::{ERR_QUIZ_LOAD, OptionDisplay, QuizVm, needs_reload, option_display};
pub use time_fmt::format_clock_time;
pub use upload_vm::{
    ERR_DROP_NOT_IMAGE, ERR_IDENTIFY_FAILED, ERR_NO_SELECTION, ImageDraft, UploadVm,
    identification_patch,
};
