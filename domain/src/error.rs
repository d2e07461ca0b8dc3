use thiserror::Error;

pub type QuizResult<T> = Result<T, QuizError>;

/// Failures surfaced to the user. None of them end the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Malformed or incomplete question payload.
    #[error("Invalid question received: {0}")]
    Validation(String),

    /// Transport failure or a non-success status from the question service.
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    UserInput(String),
}

impl QuizError {
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::Validation(_) => "validation",
            QuizError::Network(_) => "network",
            QuizError::UserInput(_) => "user_input",
        }
    }
}
