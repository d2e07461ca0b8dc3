//! Fixtures shared by the integration tests.

use domain::{AnswerContext, Question, QuestionSource, QuizError, QuizResult};
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn question(text: &str, options: [&str; 4], answer: &str) -> Question {
    Question {
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
        explanation: None,
    }
}

/// `n`-th generated question; the correct answer is always `"right"`.
pub fn numbered(n: usize) -> Question {
    question(&format!("Question number {}", n), ["right", "wrong", "other", "none"], "right")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initial(String),
    Next(AnswerContext),
}

/// Question source that replays a script of responses and records every call.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<QuizResult<Question>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSource {
    pub fn new(responses: impl IntoIterator<Item = QuizResult<Question>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A source that serves `count` valid questions in order.
    pub fn serving(count: usize) -> Self {
        Self::new((0..count).map(|n| Ok(numbered(n))))
    }

    pub fn push(&self, response: QuizResult<Question>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self, call: Call) -> QuizResult<Question> {
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QuizError::Network("script exhausted".to_string())))
    }
}

impl QuestionSource for ScriptedSource {
    async fn fetch_initial(&self, topic: &str) -> QuizResult<Question> {
        self.next_response(Call::Initial(topic.to_string()))
    }

    async fn fetch_next(&self, context: &AnswerContext) -> QuizResult<Question> {
        self.next_response(Call::Next(context.clone()))
    }
}
