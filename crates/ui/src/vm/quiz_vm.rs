use imagier_core::model::{Question, QuizAttempt, QuizReloadPolicy};

pub const ERR_QUIZ_LOAD: &str = "Failed to load quiz. Please try again.";

/// Quiz flow display state. `Empty` is a distinct "no content" outcome,
/// not an error: the fetch succeeded but the server had nothing to ask.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum QuizVm {
    #[default]
    Idle,
    Loading,
    Failed,
    Empty,
    Ready(QuizAttempt),
}

impl QuizVm {
    /// Map a successful fetch; the server's question order is kept.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        if questions.is_empty() {
            Self::Empty
        } else {
            Self::Ready(QuizAttempt::new(questions))
        }
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&QuizAttempt> {
        match self {
            Self::Ready(attempt) => Some(attempt),
            _ => None,
        }
    }
}

/// Whether entering the quiz phase must refetch. Under `AlwaysReload`
/// (the observed behavior) every entry reloads; under `CachePerWord` a
/// usable attempt for the same word is kept.
#[must_use]
pub fn needs_reload(policy: QuizReloadPolicy, cached_word: &str, word: &str, vm: &QuizVm) -> bool {
    match policy {
        QuizReloadPolicy::AlwaysReload => true,
        QuizReloadPolicy::CachePerWord => {
            cached_word != word || matches!(vm, QuizVm::Idle | QuizVm::Loading | QuizVm::Failed)
        }
    }
}

/// Visual treatment of one option row, mirroring the reveal rules: after
/// answering, the correct option is always highlighted and a wrong pick is
/// marked; before answering only the (transient) selection shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionDisplay {
    Plain,
    Selected,
    Correct,
    Incorrect,
}

#[must_use]
pub fn option_display(attempt: &QuizAttempt, index: usize) -> OptionDisplay {
    let Some(question) = attempt.current_question() else {
        return OptionDisplay::Plain;
    };
    let selected = attempt.selected() == Some(index);
    if attempt.is_answered() {
        if question.is_correct(index) {
            OptionDisplay::Correct
        } else if selected {
            OptionDisplay::Incorrect
        } else {
            OptionDisplay::Plain
        }
    } else if selected {
        OptionDisplay::Selected
    } else {
        OptionDisplay::Plain
    }
}
