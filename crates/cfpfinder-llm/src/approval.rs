//! Gating of model calls behind a user decision.

use async_trait::async_trait;

/// Reply substituted for a model answer when the user refuses a call.
pub const DENIED_REPLY: &str = r#"{"error": "Sampling denied by user"}"#;

/// What is about to be sent, for display before asking.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalRequest<'a> {
    /// Short label of the call site.
    pub purpose: &'a str,
    /// System prompt, if any.
    pub system_prompt: Option<&'a str>,
    /// Messages about to be sent, as text.
    pub messages: &'a [String],
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Completion budget.
    pub max_tokens: Option<u32>,
}

/// Decides whether a model call may proceed.
#[async_trait]
pub trait Approver: Send + Sync {
    /// `true` to send the request.
    async fn approve(&self, request: &ApprovalRequest<'_>) -> bool;
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Approver for AutoApprove {
    async fn approve(&self, request: &ApprovalRequest<'_>) -> bool {
        tracing::debug!(purpose = request.purpose, "Model call auto-approved");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_approve() {
        let messages = vec!["hello".to_string()];
        let request = ApprovalRequest {
            purpose: "test",
            system_prompt: None,
            messages: &messages,
            temperature: Some(0.3),
            max_tokens: None,
        };
        assert!(AutoApprove.approve(&request).await);
    }

    #[test]
    fn test_denied_reply_is_error_object() {
        let value: serde_json::Value = serde_json::from_str(DENIED_REPLY).unwrap();
        assert_eq!(value["error"], "Sampling denied by user");
    }
}
