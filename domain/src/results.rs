use crate::session::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question: String,
    pub correct_answer: String,
    pub user_answer: String,
}

impl QuestionDetail {
    pub fn is_correct(&self) -> bool {
        self.user_answer == self.correct_answer
    }
}

/// Summary of a finished session. Derived from history, never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score: String,
    /// Seconds between start and completion.
    pub elapsed_time: f64,
    pub details: Vec<QuestionDetail>,
}

impl QuizResults {
    pub fn compute(history: &[HistoryEntry], elapsed: Duration) -> Self {
        let total_questions = history.len();
        let correct_answers = history.iter().filter(|entry| entry.is_correct()).count();
        Self {
            total_questions,
            correct_answers,
            score: format!("{}/{}", correct_answers, total_questions),
            elapsed_time: elapsed.as_secs_f64(),
            details: history
                .iter()
                .map(|entry| QuestionDetail {
                    question: entry.question.clone(),
                    correct_answer: entry.correct_answer.clone(),
                    user_answer: entry.user_answer.clone(),
                })
                .collect(),
        }
    }

    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.correct_answers as f64 / self.total_questions as f64 * 100.0).round() as u32
    }

    pub fn elapsed_secs_rounded(&self) -> u64 {
        self.elapsed_time.round() as u64
    }
}
