//! Interactive confirmation before each model call, and answers to the
//! server's yes/no questions.

use std::io::{BufRead, Write};

use async_trait::async_trait;
use cfpfinder_llm::{ApprovalRequest, Approver};

/// Characters of each message shown before asking.
const PREVIEW_CHARS: usize = 300;
/// Characters of the system prompt shown before asking.
const SYSTEM_PREVIEW_CHARS: usize = 500;

/// Parses a y/n answer; `None` when unrecognised.
pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "o" | "oui" => Some(true),
        "n" | "no" | "non" => Some(false),
        _ => None,
    }
}

/// Answer to a server question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionAnswer {
    /// Yes.
    Yes,
    /// No.
    No,
    /// The user prefers not to answer.
    Decline,
    /// The user stops the whole operation.
    Cancel,
}

/// Parses an answer to a server question; `None` when unrecognised.
pub fn parse_question_answer(answer: &str) -> Option<QuestionAnswer> {
    match answer.trim().to_lowercase().as_str() {
        "cancel" => Some(QuestionAnswer::Cancel),
        "decline" => Some(QuestionAnswer::Decline),
        other => parse_answer(other).map(|yes| {
            if yes {
                QuestionAnswer::Yes
            } else {
                QuestionAnswer::No
            }
        }),
    }
}

/// Answers yes/no questions sent by the server.
#[async_trait]
pub trait QuestionResponder: Send + Sync {
    /// Asks `question` and returns the user's answer.
    async fn respond(&self, question: &str) -> QuestionAnswer;
}

/// Declines every question, leaving the server's default in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineQuestions;

#[async_trait]
impl QuestionResponder for DeclineQuestions {
    async fn respond(&self, question: &str) -> QuestionAnswer {
        tracing::debug!(question, "Question declined without asking");
        QuestionAnswer::Decline
    }
}

fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{head}... (truncated)")
    }
}

/// Renders what is about to be sent.
pub fn describe(request: &ApprovalRequest<'_>) -> String {
    let mut out = format!("Model call requested: {}\n", request.purpose);
    if let Some(system) = request.system_prompt {
        out.push_str(&format!("System prompt:\n{}\n", preview(system, SYSTEM_PREVIEW_CHARS)));
    }
    for (i, message) in request.messages.iter().enumerate() {
        out.push_str(&format!("Message {}:\n{}\n", i + 1, preview(message, PREVIEW_CHARS)));
    }
    if let Some(t) = request.temperature {
        out.push_str(&format!("Temperature: {t}\n"));
    }
    if let Some(m) = request.max_tokens {
        out.push_str(&format!("Max tokens: {m}\n"));
    }
    out
}

/// Asks on stdin, re-asking until the answer is recognised.
///
/// End of input counts as a refusal for model calls and as a cancel for
/// questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinApprover;

#[async_trait]
impl Approver for StdinApprover {
    async fn approve(&self, request: &ApprovalRequest<'_>) -> bool {
        let summary = describe(request);
        let asked = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let _ = writeln!(stdout, "\n{summary}");
            loop {
                let _ = write!(stdout, "Allow this model call? (y/n): ");
                let _ = stdout.flush();
                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => return false,
                    Ok(_) => {}
                }
                match parse_answer(&line) {
                    Some(answer) => return answer,
                    None => {
                        let _ = writeln!(stdout, "Invalid answer, use 'y' or 'n'.");
                    }
                }
            }
        })
        .await;

        let approved = asked.unwrap_or(false);
        tracing::info!(purpose = request.purpose, approved, "Model call decision");
        approved
    }
}

#[async_trait]
impl QuestionResponder for StdinApprover {
    async fn respond(&self, question: &str) -> QuestionAnswer {
        let question = question.to_string();
        let asked = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let _ = writeln!(stdout, "\nThe server asks:\n{question}\n");
            loop {
                let _ = write!(stdout, "Answer (y/n, 'decline' or 'cancel'): ");
                let _ = stdout.flush();
                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => return QuestionAnswer::Cancel,
                    Ok(_) => {}
                }
                match parse_question_answer(&line) {
                    Some(answer) => return answer,
                    None => {
                        let _ = writeln!(stdout, "Invalid answer, use 'y' for yes or 'n' for no.");
                    }
                }
            }
        })
        .await;

        let answer = asked.unwrap_or(QuestionAnswer::Cancel);
        tracing::info!(?answer, "Server question answered");
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("Y\n"), Some(true));
        assert_eq!(parse_answer(" oui "), Some(true));
        assert_eq!(parse_answer("non"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer(""), None);
    }

    #[test]
    fn test_parse_question_answer() {
        assert_eq!(parse_question_answer("o"), Some(QuestionAnswer::Yes));
        assert_eq!(parse_question_answer("NO\n"), Some(QuestionAnswer::No));
        assert_eq!(parse_question_answer(" decline"), Some(QuestionAnswer::Decline));
        assert_eq!(parse_question_answer("Cancel"), Some(QuestionAnswer::Cancel));
        assert_eq!(parse_question_answer("later"), None);
    }

    #[tokio::test]
    async fn test_decline_questions() {
        assert_eq!(DeclineQuestions.respond("Apply?").await, QuestionAnswer::Decline);
    }

    #[test]
    fn test_describe_truncates() {
        let long = "x".repeat(400);
        let messages = vec![long];
        let request = ApprovalRequest {
            purpose: "narrative",
            system_prompt: Some("be brief"),
            messages: &messages,
            temperature: Some(0.3),
            max_tokens: None,
        };
        let text = describe(&request);
        assert!(text.contains("Model call requested: narrative"));
        assert!(text.contains("be brief"));
        assert!(text.contains("... (truncated)"));
        assert!(text.contains("Temperature: 0.3"));
        assert!(!text.contains("Max tokens"));
    }
}
