use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use domain::{AnswerContext, QuestionSource, QuizError};
use infrastructure::{config::Config, question_client::QuestionClient};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/py", addr)
}

fn client_for(base_url: String) -> QuestionClient {
    let config = Config::default().with_overrides(Some(base_url), Some(5));
    QuestionClient::new(&config).unwrap()
}

/// Router answering both question routes with `status` and `body`, recording request bodies.
fn question_router(status: StatusCode, body: Value, captured: Captured) -> Router {
    let initial = {
        let captured = captured.clone();
        let body = body.clone();
        move |Json(request): Json<Value>| async move {
            captured.lock().unwrap().push(request);
            (status, Json(body)).into_response()
        }
    };
    let next = move |Json(request): Json<Value>| async move {
        captured.lock().unwrap().push(request);
        (status, Json(body)).into_response()
    };
    Router::new()
        .route("/py/generate-initial-question", post(initial))
        .route("/py/generate-next-question", post(next))
}

#[tokio::test]
async fn fetches_initial_question() {
    let captured = Captured::default();
    let body = json!({
        "question": "2+2=?",
        "options": ["3", "4", "5", "6"],
        "answer": "4",
        "explanation": "Addition."
    });
    let base = serve(question_router(StatusCode::OK, body, captured.clone())).await;

    let question = client_for(base).fetch_initial("algebra").await.unwrap();
    assert_eq!(question.question, "2+2=?");
    assert_eq!(question.answer, "4");
    assert_eq!(question.explanation.as_deref(), Some("Addition."));
    assert_eq!(captured.lock().unwrap().as_slice(), &[json!({ "topic": "algebra" })]);
}

#[tokio::test]
async fn sends_answer_context_for_next_question() {
    let captured = Captured::default();
    let body = json!({
        "question": "3*3=?",
        "options": ["6", "9", "12", "33"],
        "answer": "9"
    });
    let base = serve(question_router(StatusCode::OK, body, captured.clone())).await;

    let context = AnswerContext {
        user_answer: "3".into(),
        previous_question: "2+2=?".into(),
        response_correct: false,
        topic: "algebra".into(),
    };
    let question = client_for(base).fetch_next(&context).await.unwrap();
    assert_eq!(question.explanation, None);
    assert_eq!(
        captured.lock().unwrap().as_slice(),
        &[json!({
            "user_answer": "3",
            "previous_question": "2+2=?",
            "response_correct": false,
            "topic": "algebra"
        })]
    );
}

#[tokio::test]
async fn server_error_is_a_network_error() {
    let base = serve(question_router(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "generator unavailable" }),
        Captured::default(),
    ))
    .await;

    let err = client_for(base).fetch_initial("algebra").await.unwrap_err();
    match err {
        QuizError::Network(message) => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("generator unavailable"), "{message}");
        }
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn three_options_fail_validation() {
    let body = json!({ "question": "q", "options": ["a", "b", "c"], "answer": "a" });
    let base = serve(question_router(StatusCode::OK, body, Captured::default())).await;

    let context = AnswerContext {
        user_answer: "a".into(),
        previous_question: "p".into(),
        response_correct: true,
        topic: "t".into(),
    };
    let err = client_for(base).fetch_next(&context).await.unwrap_err();
    assert!(matches!(err, QuizError::Validation(_)));
}

#[tokio::test]
async fn missing_question_fails_validation() {
    let body = json!({ "options": ["a", "b", "c", "d"], "answer": "a" });
    let base = serve(question_router(StatusCode::OK, body, Captured::default())).await;

    let err = client_for(base).fetch_initial("t").await.unwrap_err();
    assert!(matches!(err, QuizError::Validation(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(format!("http://{}/py", addr))
        .fetch_initial("algebra")
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::Network(_)));
}

#[tokio::test]
async fn slow_service_times_out() {
    let router = Router::new().route(
        "/py/generate-initial-question",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            StatusCode::OK
        }),
    );
    let base = serve(router).await;
    let config = Config::default().with_overrides(Some(base), None);
    let config = Config {
        request_timeout: Duration::from_millis(200),
        ..config
    };

    let err = QuestionClient::new(&config)
        .unwrap()
        .fetch_initial("algebra")
        .await
        .unwrap_err();
    assert_eq!(err, QuizError::Network("request timed out".to_string()));
}

#[tokio::test]
async fn health_check_reads_status() {
    let router = Router::new().route("/py/health", get(|| async { Json(json!({ "status": "ok" })) }));
    let base = serve(router).await;
    client_for(format!("{}/", base)).health().await.unwrap();
}
