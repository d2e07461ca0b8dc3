use crate::error::{QuizError, QuizResult};
use serde::{Deserialize, Serialize};

pub const OPTIONS_PER_QUESTION: usize = 4;

/// A multiple-choice question as produced by the question service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Context sent with a follow-up request so the service can adapt difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerContext {
    pub user_answer: String,
    pub previous_question: String,
    pub response_correct: bool,
    pub topic: String,
}

// Every field optional so a missing key is reported as a validation failure
// with a useful message instead of a bare serde error.
#[derive(Deserialize)]
struct RawQuestion {
    question: Option<String>,
    options: Option<Vec<String>>,
    answer: Option<String>,
    explanation: Option<String>,
}

impl Question {
    /// Parses and validates a response body.
    pub fn from_json(body: &str) -> QuizResult<Self> {
        let raw: RawQuestion = serde_json::from_str(body)
            .map_err(|e| QuizError::Validation(format!("response is not a question object: {}", e)))?;

        let question = Question {
            question: raw
                .question
                .ok_or_else(|| QuizError::Validation("missing field `question`".to_string()))?,
            options: raw
                .options
                .ok_or_else(|| QuizError::Validation("missing field `options`".to_string()))?,
            answer: raw
                .answer
                .ok_or_else(|| QuizError::Validation("missing field `answer`".to_string()))?,
            explanation: raw.explanation.filter(|e| !e.trim().is_empty()),
        };
        question.validate()?;
        Ok(question)
    }

    pub fn validate(&self) -> QuizResult<()> {
        if self.question.trim().is_empty() {
            return Err(QuizError::Validation("question text is empty".to_string()));
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(QuizError::Validation(format!(
                "expected {} options, got {}",
                OPTIONS_PER_QUESTION,
                self.options.len()
            )));
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].contains(option) {
                return Err(QuizError::Validation(format!("duplicate option `{}`", option)));
            }
        }
        if !self.options.contains(&self.answer) {
            return Err(QuizError::Validation(format!(
                "answer `{}` is not one of the options",
                self.answer
            )));
        }
        Ok(())
    }

    /// Byte-exact comparison against the expected answer.
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.answer
    }
}
