use std::sync::Arc;

use imagier_core::model::{LearningContext, QuizReloadPolicy};
use imagier_core::time::Clock;
use services::{RequestSequencer, TutorService};

/// What the composition root (e.g. `crates/app`) must supply to the UI.
pub trait UiApp: Send + Sync {
    fn tutor(&self) -> Arc<TutorService>;
    fn clock(&self) -> Clock;
    fn learning_context(&self) -> LearningContext;
    fn quiz_reload_policy(&self) -> QuizReloadPolicy;
}

#[derive(Clone)]
pub struct AppContext {
    tutor: Arc<TutorService>,
    clock: Clock,
    learning_context: LearningContext,
    quiz_reload_policy: QuizReloadPolicy,
    quiz_requests: RequestSequencer,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            tutor: app.tutor(),
            clock: app.clock(),
            learning_context: app.learning_context(),
            quiz_reload_policy: app.quiz_reload_policy(),
            quiz_requests: RequestSequencer::new(),
        }
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn learning_context(&self) -> LearningContext {
        self.learning_context
    }

    #[must_use]
    pub fn quiz_reload_policy(&self) -> QuizReloadPolicy {
        self.quiz_reload_policy
    }

    /// Sequencer stamping quiz fetches so a stale response cannot
    /// overwrite a fresher load. Clones share the counter.
    #[must_use]
    pub fn quiz_requests(&self) -> RequestSequencer {
        self.quiz_requests.clone()
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
