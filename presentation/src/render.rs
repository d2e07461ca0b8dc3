use colored::Colorize;
use domain::{Question, QuizError, QuizResults, QUESTIONS_PER_QUIZ};
use shared::utils::format_time;

pub fn status_line(score: usize, elapsed_secs: u64) -> String {
    format!(
        "Score: {}/{}   Time: {}",
        score,
        QUESTIONS_PER_QUIZ,
        format_time(elapsed_secs)
    )
}

pub fn question_heading(answered: usize) -> String {
    format!("Question {} of {}", answered + 1, QUESTIONS_PER_QUIZ)
}

/// Feedback shown right after an answer is scored.
pub fn answer_feedback(question: &Question, selected: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if question.is_correct(selected) {
        lines.push("Correct!".green().bold().to_string());
    } else {
        lines.push(format!("{} Correct answer: {}", "Incorrect.".red().bold(), question.answer.green()));
    }
    if let Some(explanation) = &question.explanation {
        lines.push(explanation.dimmed().to_string());
    }
    lines
}

pub fn results_summary(results: &QuizResults) -> Vec<String> {
    let mut lines = vec![
        "Quiz Complete!".bold().to_string(),
        format!("Final Score: {} ({}%)", results.score, results.percentage()),
        format!("Time taken: {} seconds", results.elapsed_secs_rounded()),
        String::new(),
        "Question Details:".bold().to_string(),
    ];
    for (i, detail) in results.details.iter().enumerate() {
        lines.push(format!("Question {}: {}", i + 1, detail.question));
        let answer = format!("  Your answer: {}", detail.user_answer);
        if detail.is_correct() {
            lines.push(answer.green().to_string());
        } else {
            lines.push(answer.red().to_string());
            lines.push(format!("  Correct answer: {}", detail.correct_answer).green().to_string());
        }
    }
    lines
}

pub fn error_notice(err: &QuizError) -> String {
    let headline = match err {
        QuizError::Validation(_) => "The question service sent an unusable question.",
        QuizError::Network(_) => "Could not reach the question service.",
        QuizError::UserInput(_) => "Check your input.",
    };
    format!("{} {}", headline.red().bold(), err.to_string().red())
}
