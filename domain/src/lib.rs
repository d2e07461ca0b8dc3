pub mod error;
pub mod question;
pub mod results;
pub mod session;
pub mod source;

pub use error::{QuizError, QuizResult};
pub use question::{AnswerContext, Question};
pub use results::{QuestionDetail, QuizResults};
pub use session::{HistoryEntry, QuizSession, QuizState, SessionId, Submission, QUESTIONS_PER_QUIZ};
pub use source::QuestionSource;
