use crate::render;
use application::quiz_service::{AnswerOutcome, QuizService};
use clap::Parser;
use colored::Colorize;
use crossterm::{execute, terminal::SetTitle};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use domain::{Question, QuestionSource, QuizError, QuizResult, QuizResults};
use infrastructure::{config::Config, question_client::QuestionClient};
use shared::{confirmation::ask_confirmation, types::Result, utils::format_time};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Parser, Debug)]
#[command(name = "quizline")]
#[command(about = "Adaptive five-question quiz on any topic", long_about = None)]
pub struct Cli {
    /// Base URL of the question service (overrides QUIZ_API_URL)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (overrides QUIZ_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also print the final results as JSON
    #[arg(long)]
    pub json: bool,

    /// Check that the question service is reachable and exit
    #[arg(long)]
    pub check: bool,

    /// Quiz topic (asked interactively when omitted)
    #[arg(trailing_var_arg = true)]
    pub topic: Vec<String>,
}

/// How a played session ended.
enum Finish {
    Completed(QuizResults),
    Abandoned,
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new() -> Self {
        Self {
            config: Config::load(),
        }
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        self.config = self.config.clone().with_overrides(cli.endpoint.clone(), cli.timeout);
        let client = QuestionClient::new(&self.config)?;
        tracing::debug!(endpoint = %client.base_url(), "question client ready");

        if cli.check {
            return self.handle_check(&client).await;
        }
        self.handle_quiz(QuizService::new(client), cli.topic.join(" "), cli.json)
            .await
    }

    async fn handle_check(&self, client: &QuestionClient) -> Result<()> {
        match client.health().await {
            Ok(()) => {
                println!("{}", format!("Question service at {} is up.", client.base_url()).green());
                Ok(())
            }
            Err(e) => Err(health_failure(client.base_url(), e)),
        }
    }

    async fn handle_quiz<S: QuestionSource>(
        &self,
        mut service: QuizService<S>,
        initial_topic: String,
        json: bool,
    ) -> Result<()> {
        let mut topic = initial_topic;
        loop {
            if topic.trim().is_empty() {
                topic = ask_topic("")?;
            }
            if is_exit(&topic) {
                break;
            }

            println!("{}", "Loading...".yellow());
            if let Err(e) = service.start(&topic).await {
                println!("{}", render::error_notice(&e));
                topic = ask_topic(&topic)?;
                continue;
            }

            let clock = service
                .ticks()
                .map(|ticks| spawn_title_clock(ticks, service.topic().to_string()));
            let finish = self.play(&mut service).await;
            if let Some(handle) = clock {
                handle.abort();
            }

            match finish? {
                Finish::Completed(results) => {
                    println!();
                    for line in render::results_summary(&results) {
                        println!("{}", line);
                    }
                    if json {
                        println!("{}", serde_json::to_string_pretty(&results)?);
                    }
                }
                Finish::Abandoned => println!("{}", "Quiz abandoned.".yellow()),
            }

            if !ask_confirmation("Restart quiz?", true)? {
                break;
            }
            topic = service.topic().to_string();
        }
        Ok(())
    }

    async fn play<S: QuestionSource>(&self, service: &mut QuizService<S>) -> Result<Finish> {
        loop {
            let question = match service.current_question() {
                Some(question) => question.clone(),
                None => return Ok(Finish::Abandoned),
            };

            println!();
            println!("{}", render::status_line(service.score(), service.elapsed().as_secs()).cyan());
            println!("{}", render::question_heading(service.questions_answered()).bold());
            println!("{}", question.question);
            let selection = Select::with_theme(&ColorfulTheme::default())
                .items(&question.options)
                .default(0)
                .interact()?;
            let option = &question.options[selection];

            let outcome = service.submit_answer(option).await;
            for line in feedback_lines(&outcome, &question, option) {
                println!("{}", line);
            }

            match outcome {
                Ok(AnswerOutcome::Completed { results, .. }) => return Ok(Finish::Completed(results)),
                Ok(AnswerOutcome::Advanced { .. }) | Ok(AnswerOutcome::Ignored) => continue,
                Err(e) => {
                    println!("{}", render::error_notice(&e));
                    if !self.recover_next(service).await? {
                        return Ok(Finish::Abandoned);
                    }
                }
            }
        }
    }

    /// Offers retries until the follow-up question arrives or the user gives up.
    async fn recover_next<S: QuestionSource>(&self, service: &mut QuizService<S>) -> Result<bool> {
        loop {
            if !ask_confirmation("Retry fetching the next question?", true)? {
                return Ok(false);
            }
            println!("{}", "Loading...".yellow());
            match service.retry_next().await {
                Ok(()) => return Ok(true),
                Err(e) => println!("{}", render::error_notice(&e)),
            }
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn ask_topic(previous: &str) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt("Enter a topic (or 'exit')");
    if !previous.trim().is_empty() {
        input = input.default(previous.to_string());
    }
    Ok(input.interact_text()?)
}

/// Reported once by the caller; the health body is not a question, so no question notice.
fn health_failure(base_url: &str, err: QuizError) -> anyhow::Error {
    anyhow::Error::new(err).context(format!("Question service at {} failed its health check", base_url))
}

/// Nothing is shown when the submission was ignored.
fn feedback_lines(outcome: &QuizResult<AnswerOutcome>, question: &Question, selected: &str) -> Vec<String> {
    match outcome {
        Ok(AnswerOutcome::Ignored) => Vec::new(),
        _ => render::answer_feedback(question, selected),
    }
}

fn is_exit(topic: &str) -> bool {
    let topic = topic.trim();
    topic.eq_ignore_ascii_case("exit") || topic.eq_ignore_ascii_case("quit")
}

/// Mirrors the session clock into the terminal title until the timer stops.
fn spawn_title_clock(mut ticks: watch::Receiver<u64>, topic: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        while ticks.changed().await.is_ok() {
            let secs = *ticks.borrow_and_update();
            let title = format!("quizline | {} | {}", topic, format_time(secs));
            if execute!(std::io::stdout(), SetTitle(title)).is_err() {
                break;
            }
        }
    })
}
