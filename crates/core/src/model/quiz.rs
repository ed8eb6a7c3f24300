use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::QuestionError;

/// A multiple-choice question as served by the tutor endpoint. Option
/// order is the server's order and is kept as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` when fewer than two options are given or
    /// none of them equals `correct_answer` exactly.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let correct_answer = correct_answer.into();
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuestionError::MissingCorrectOption);
        }
        Ok(Self {
            text: text.into(),
            options,
            correct_answer,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Exact string equality against the server's answer; no trimming or
    /// case folding happens client-side.
    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        self.options
            .get(option_index)
            .is_some_and(|option| *option == self.correct_answer)
    }
}

/// Outcome of scoring one answer. `Correct` doubles as the celebration
/// event: the presentation layer may react however it wishes, the engine
/// never touches rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// Whether leaving the quiz phase discards the running attempt.
///
/// The observed product behavior is a fresh fetch on every entry; the
/// cache variant exists so that choice can flip without touching the
/// state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuizReloadPolicy {
    #[default]
    AlwaysReload,
    CachePerWord,
}

/// One pass through a fixed question sequence.
///
/// Holds the progression state: current index, the locked-in selection for
/// the current question, the running score, and the terminal completed
/// flag. `score` never decreases within an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizAttempt {
    questions: Vec<Question>,
    current_index: usize,
    selected: Option<usize>,
    answered: bool,
    score: u32,
    completed: bool,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            selected: None,
            answered: false,
            score: 0,
            completed: false,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            return None;
        }
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Lock in an answer for the current question. First answer wins: once
    /// `answered` is set, further calls are no-ops until
    /// [`advance`](Self::advance) moves on. Returns the scoring outcome,
    /// or `None` when the call changed nothing.
    pub fn select_option(&mut self, option_index: usize) -> Option<AnswerOutcome> {
        if self.answered || self.completed {
            return None;
        }
        let question = self.questions.get(self.current_index)?;
        if option_index >= question.options().len() {
            return None;
        }

        self.selected = Some(option_index);
        self.answered = true;
        if question.is_correct(option_index) {
            self.score += 1;
            Some(AnswerOutcome::Correct)
        } else {
            Some(AnswerOutcome::Incorrect)
        }
    }

    /// Move past the current question. Only meaningful once answered: on
    /// the last index this completes the attempt (terminal), otherwise it
    /// steps forward and clears the per-question state.
    pub fn advance(&mut self) {
        if !self.answered || self.completed {
            return;
        }
        if self.is_last_question() {
            self.completed = true;
        } else {
            self.current_index += 1;
            self.selected = None;
            self.answered = false;
        }
    }

    /// Start the attempt over with the same questions in a fresh uniform
    /// shuffle. No refetch: this is a presentation variation, not a new
    /// assessment.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current_index = 0;
        self.selected = None;
        self.answered = false;
        self.score = 0;
        self.completed = false;
        self.questions.shuffle(rng);
    }

    /// [`restart`](Self::restart) with the thread-local generator.
    pub fn restart_shuffled(&mut self) {
        self.restart(&mut rand::rng());
    }
}

/// Encouragement tier for a finished attempt. The 90/70/50 thresholds are
/// part of the product contract.
#[must_use]
pub fn score_message(score: u32, total: usize) -> &'static str {
    let total = u32::try_from(total).unwrap_or(u32::MAX);
    if total == 0 {
        return "Continuez à pratiquer! Keep practicing, you'll get better!";
    }
    let scaled = score.saturating_mul(100);
    if scaled >= total.saturating_mul(90) {
        "Fantastique! You're a French language superstar!"
    } else if scaled >= total.saturating_mul(70) {
        "Très bien! You're making excellent progress!"
    } else if scaled >= total.saturating_mul(50) {
        "Bien! Keep practicing to improve your French."
    } else {
        "Continuez à pratiquer! Keep practicing, you'll get better!"
    }
}
