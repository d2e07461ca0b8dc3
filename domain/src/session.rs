use crate::question::{AnswerContext, Question};
use crate::results::QuizResults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const QUESTIONS_PER_QUIZ: usize = 5;

/// Generation number of a session. Each start issues a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
}

impl HistoryEntry {
    pub fn is_correct(&self) -> bool {
        self.user_answer == self.correct_answer
    }
}

/// Where a session is in its lifecycle. Each variant carries only what is valid in it.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    Idle,
    AwaitingAnswer {
        question: Question,
    },
    /// An answer was scored and the follow-up question is pending, or its fetch failed.
    Answered {
        question: Question,
        selected: String,
        context: AnswerContext,
    },
    Complete {
        results: QuizResults,
        elapsed: Duration,
    },
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::Idle => "idle",
            QuizState::AwaitingAnswer { .. } => "awaiting_answer",
            QuizState::Answered { .. } => "answered",
            QuizState::Complete { .. } => "complete",
        }
    }
}

/// Outcome of submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Not awaiting an answer; nothing changed.
    Ignored,
    /// Answer recorded; fetch the next question with this context.
    Continue { correct: bool, context: AnswerContext },
    /// Final answer recorded; the session is complete.
    Finished { correct: bool, results: QuizResults },
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    id: SessionId,
    topic: String,
    score: usize,
    history: Vec<HistoryEntry>,
    state: QuizState,
}

impl QuizSession {
    pub fn idle() -> Self {
        Self {
            id: SessionId::default(),
            topic: String::new(),
            score: 0,
            history: Vec::new(),
            state: QuizState::Idle,
        }
    }

    /// A fresh attempt showing its first question.
    pub fn begin(id: SessionId, topic: impl Into<String>, first: Question) -> Self {
        Self {
            id,
            topic: topic.into(),
            score: 0,
            history: Vec::with_capacity(QUESTIONS_PER_QUIZ),
            state: QuizState::AwaitingAnswer { question: first },
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn questions_answered(&self) -> usize {
        self.history.len()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, QuizState::Complete { .. })
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            QuizState::AwaitingAnswer { question } | QuizState::Answered { question, .. } => {
                Some(question)
            }
            _ => None,
        }
    }

    pub fn selected_answer(&self) -> Option<&str> {
        match &self.state {
            QuizState::Answered { selected, .. } => Some(selected),
            _ => None,
        }
    }

    /// Context of the last answer while its follow-up question is outstanding.
    pub fn pending_context(&self) -> Option<&AnswerContext> {
        match &self.state {
            QuizState::Answered { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Scores `option` against the current question.
    ///
    /// `clock` is read only when this answer completes the session, so the
    /// frozen elapsed time is taken at the moment of completion.
    pub fn submit(&mut self, option: &str, clock: impl FnOnce() -> Duration) -> Submission {
        let question = match &self.state {
            QuizState::AwaitingAnswer { question } => question.clone(),
            _ => return Submission::Ignored,
        };

        let correct = question.is_correct(option);
        if correct {
            self.score += 1;
        }
        self.history.push(HistoryEntry {
            question: question.question.clone(),
            user_answer: option.to_string(),
            correct_answer: question.answer.clone(),
        });

        if self.history.len() >= QUESTIONS_PER_QUIZ {
            let elapsed = clock();
            let results = QuizResults::compute(&self.history, elapsed);
            self.state = QuizState::Complete {
                results: results.clone(),
                elapsed,
            };
            return Submission::Finished { correct, results };
        }

        let context = AnswerContext {
            user_answer: option.to_string(),
            previous_question: question.question.clone(),
            response_correct: correct,
            topic: self.topic.clone(),
        };
        self.state = QuizState::Answered {
            question,
            selected: option.to_string(),
            context: context.clone(),
        };
        Submission::Continue { correct, context }
    }

    /// Shows the follow-up question. Returns false when no answer was pending.
    pub fn advance(&mut self, next: Question) -> bool {
        if !matches!(self.state, QuizState::Answered { .. }) {
            return false;
        }
        self.state = QuizState::AwaitingAnswer { question: next };
        true
    }

    /// Recomputes the summary of a completed session.
    pub fn results(&self) -> Option<QuizResults> {
        match &self.state {
            QuizState::Complete { elapsed, .. } => {
                Some(QuizResults::compute(&self.history, *elapsed))
            }
            _ => None,
        }
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::idle()
    }
}
