//! Shared handler state.

use crate::auth::AdminGate;
use quizcast_application::{
    ChangeNotifier, CheckAnswerUseCase, QuestionStore, ReplaceQuestionsUseCase,
};
use std::sync::Arc;
use std::time::Duration;

/// Everything the handlers need, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub notifier: Arc<ChangeNotifier>,
    pub replace_questions: Arc<ReplaceQuestionsUseCase>,
    pub check_answer: Arc<CheckAnswerUseCase>,
    pub gate: Arc<AdminGate>,
    /// Interval between keep-alive comments on idle change streams.
    pub heartbeat: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        notifier: Arc<ChangeNotifier>,
        gate: AdminGate,
        heartbeat: Duration,
    ) -> Self {
        Self {
            replace_questions: Arc::new(ReplaceQuestionsUseCase::new(
                store.clone(),
                notifier.clone(),
            )),
            check_answer: Arc::new(CheckAnswerUseCase::new(store.clone())),
            store,
            notifier,
            gate: Arc::new(gate),
            heartbeat,
        }
    }
}
