use crate::error::QuizResult;
use crate::question::{AnswerContext, Question};

/// Remote generator of quiz questions.
///
/// Implementations must hand back only questions that passed
/// [`Question::validate`].
pub trait QuestionSource {
    fn fetch_initial(&self, topic: &str) -> impl std::future::Future<Output = QuizResult<Question>> + Send;

    fn fetch_next(
        &self,
        context: &AnswerContext,
    ) -> impl std::future::Future<Output = QuizResult<Question>> + Send;
}
