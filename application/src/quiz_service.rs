use crate::timer::{SessionTimer, TICK_PERIOD};
use domain::{
    AnswerContext, Question, QuestionSource, QuizError, QuizResult, QuizResults, QuizSession,
    QuizState, SessionId, Submission,
};
use shared::telemetry::Stopwatch;
use std::time::Duration;
use tokio::sync::watch;

/// A pending initial-question request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTicket {
    epoch: u64,
    topic: String,
}

impl StartTicket {
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// A pending follow-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextTicket {
    epoch: u64,
    context: AnswerContext,
}

impl NextTicket {
    pub fn context(&self) -> &AnswerContext {
        &self.context
    }
}

/// Whether a finished request changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// Superseded by a later request; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// No question was waiting for an answer, or a request is still pending.
    Ignored,
    Advanced { correct: bool },
    Completed { correct: bool, results: QuizResults },
}

/// Drives one quiz attempt at a time against a [`QuestionSource`].
///
/// Every request is issued under an epoch. Starting, or issuing another
/// request, bumps the epoch, and a response carrying an older epoch is
/// discarded without touching state.
pub struct QuizService<S> {
    source: S,
    session: QuizSession,
    stopwatch: Option<Stopwatch>,
    timer: Option<SessionTimer>,
    epoch: u64,
    loading: bool,
    tick_period: Duration,
}

impl<S: QuestionSource> QuizService<S> {
    pub fn new(source: S) -> Self {
        Self::with_tick_period(source, TICK_PERIOD)
    }

    pub fn with_tick_period(source: S, tick_period: Duration) -> Self {
        Self {
            source,
            session: QuizSession::idle(),
            stopwatch: None,
            timer: None,
            epoch: 0,
            loading: false,
            tick_period,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn state(&self) -> &QuizState {
        self.session.state()
    }

    pub fn topic(&self) -> &str {
        self.session.topic()
    }

    pub fn score(&self) -> usize {
        self.session.score()
    }

    pub fn questions_answered(&self) -> usize {
        self.session.questions_answered()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Live while the session runs, frozen once it completes.
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.map(|sw| sw.elapsed()).unwrap_or_default()
    }

    pub fn results(&self) -> Option<QuizResults> {
        self.session.results()
    }

    /// Elapsed-seconds ticks of the running session.
    pub fn ticks(&self) -> Option<watch::Receiver<u64>> {
        self.timer.as_ref().map(SessionTimer::subscribe)
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(SessionTimer::is_running)
    }

    /// Starts a new attempt on `topic`. On failure the previous session is left as it was.
    pub async fn start(&mut self, topic: &str) -> QuizResult<()> {
        let ticket = self.begin_start(topic)?;
        let result = self.source.fetch_initial(ticket.topic()).await;
        self.finish_start(ticket, result).map(|_| ())
    }

    pub fn begin_start(&mut self, topic: &str) -> QuizResult<StartTicket> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizError::UserInput("Please enter a topic to start the quiz.".to_string()));
        }
        self.epoch += 1;
        self.loading = true;
        tracing::debug!(epoch = self.epoch, topic, "requesting initial question");
        Ok(StartTicket {
            epoch: self.epoch,
            topic: topic.to_string(),
        })
    }

    /// Starts the session timer on success, so it must be called from within
    /// a tokio runtime.
    pub fn finish_start(&mut self, ticket: StartTicket, result: QuizResult<Question>) -> QuizResult<Applied> {
        if ticket.epoch != self.epoch {
            tracing::debug!(epoch = ticket.epoch, current = self.epoch, "dropping stale initial question");
            return Ok(Applied::Stale);
        }
        self.loading = false;
        let question = result.map_err(|e| {
            tracing::warn!(topic = %ticket.topic, kind = e.kind(), error = %e, "failed to start quiz");
            e
        })?;

        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
        let id = SessionId(ticket.epoch);
        self.session = QuizSession::begin(id, ticket.topic, question);
        let stopwatch = Stopwatch::start();
        self.stopwatch = Some(stopwatch);
        self.timer = Some(SessionTimer::start(stopwatch, self.tick_period));
        tracing::info!(session = %id, topic = %self.session.topic(), "quiz started");
        Ok(Applied::Applied)
    }

    /// Scores `option` and, unless that was the final answer, fetches the next question.
    ///
    /// When the fetch fails the answer stays recorded and [`retry_next`](Self::retry_next)
    /// can be used to try again.
    pub async fn submit_answer(&mut self, option: &str) -> QuizResult<AnswerOutcome> {
        if self.loading {
            return Ok(AnswerOutcome::Ignored);
        }
        let stopwatch = &mut self.stopwatch;
        let submission = self
            .session
            .submit(option, || stopwatch.as_mut().map(Stopwatch::freeze).unwrap_or_default());

        match submission {
            Submission::Ignored => Ok(AnswerOutcome::Ignored),
            Submission::Finished { correct, results } => {
                if let Some(mut timer) = self.timer.take() {
                    timer.stop();
                }
                tracing::info!(
                    session = %self.session.id(),
                    score = %results.score,
                    elapsed = results.elapsed_time,
                    "quiz complete"
                );
                Ok(AnswerOutcome::Completed { correct, results })
            }
            Submission::Continue { correct, .. } => {
                tracing::debug!(
                    session = %self.session.id(),
                    correct,
                    answered = self.session.questions_answered(),
                    "answer recorded"
                );
                self.fetch_next().await?;
                Ok(AnswerOutcome::Advanced { correct })
            }
        }
    }

    /// Re-requests the follow-up question after a failed fetch.
    pub async fn retry_next(&mut self) -> QuizResult<()> {
        self.fetch_next().await.map(|_| ())
    }

    async fn fetch_next(&mut self) -> QuizResult<Applied> {
        let ticket = self.begin_next()?;
        let result = self.source.fetch_next(ticket.context()).await;
        self.finish_next(ticket, result)
    }

    /// Refused while another request is outstanding, so a retry cannot
    /// supersede a pending restart.
    pub fn begin_next(&mut self) -> QuizResult<NextTicket> {
        if self.loading {
            return Err(QuizError::UserInput("A request is already in progress.".to_string()));
        }
        let context = self
            .session
            .pending_context()
            .cloned()
            .ok_or_else(|| QuizError::UserInput("No answer is waiting for a next question.".to_string()))?;
        self.epoch += 1;
        self.loading = true;
        Ok(NextTicket {
            epoch: self.epoch,
            context,
        })
    }

    pub fn finish_next(&mut self, ticket: NextTicket, result: QuizResult<Question>) -> QuizResult<Applied> {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                epoch = ticket.epoch,
                current = self.epoch,
                state = self.session.state().name(),
                "dropping stale next question"
            );
            return Ok(Applied::Stale);
        }
        self.loading = false;
        let question = result.map_err(|e| {
            tracing::warn!(session = %self.session.id(), kind = e.kind(), error = %e, "failed to fetch next question");
            e
        })?;
        if self.session.advance(question) {
            Ok(Applied::Applied)
        } else {
            Ok(Applied::Stale)
        }
    }
}
