use crate::config::Config;
use domain::{AnswerContext, Question, QuestionSource, QuizError, QuizResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;

const ERROR_BODY_LIMIT: usize = 200;

#[derive(Serialize)]
struct TopicRequest<'a> {
    topic: &'a str,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP adapter for the question-generation service.
#[derive(Clone)]
pub struct QuestionClient {
    client: Arc<Client>,
    base_url: String,
}

impl QuestionClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks that the service is up.
    pub async fn health(&self) -> QuizResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_error(&url, status, &text));
        }
        let health: HealthResponse = serde_json::from_str(&text)
            .map_err(|e| QuizError::Validation(format!("unexpected health response: {}", e)))?;
        if health.status != "ok" {
            return Err(QuizError::Network(format!("service reports status `{}`", health.status)));
        }
        Ok(())
    }

    async fn post_question<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> QuizResult<Question> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "requesting question");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "question service returned an error");
            return Err(status_error(&url, status, &text));
        }
        let question = Question::from_json(&text).map_err(|e| {
            tracing::warn!(%url, error = %e, "rejected question payload");
            e
        })?;
        tracing::debug!(question = %question.question, "question received");
        Ok(question)
    }
}

impl QuestionSource for QuestionClient {
    async fn fetch_initial(&self, topic: &str) -> QuizResult<Question> {
        self.post_question("generate-initial-question", &TopicRequest { topic })
            .await
    }

    async fn fetch_next(&self, context: &AnswerContext) -> QuizResult<Question> {
        self.post_question("generate-next-question", context).await
    }
}

fn transport_error(err: reqwest::Error) -> QuizError {
    if err.is_timeout() {
        QuizError::Network("request timed out".to_string())
    } else if err.is_connect() {
        QuizError::Network(format!("could not connect to question service: {}", err))
    } else {
        QuizError::Network(err.to_string())
    }
}

fn status_error(url: &str, status: reqwest::StatusCode, body: &str) -> QuizError {
    let snippet: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if snippet.is_empty() {
        QuizError::Network(format!("{} returned {}", url, status))
    } else {
        QuizError::Network(format!("{} returned {}: {}", url, status, snippet))
    }
}
