//! Response generation for the chat assistant
//!
//! Forwards one utterance to the LLM with the system instruction and turns
//! whatever comes back into display text. Failures never escape: they become
//! one of two fixed apology strings and the cause goes to the log.

use crate::llm::{LlmRequest, LlmService};
use crate::system_prompt::SystemPrompt;
use std::sync::Arc;

/// Shown when the service answered but produced no text
pub const EMPTY_REPLY_FALLBACK: &str =
    "I apologize, I couldn't generate a response at this moment.";

/// Shown when the call itself failed
pub const CONNECTION_FALLBACK: &str =
    "I'm having trouble connecting to the summitEHR knowledge base right now. Please try again later.";

/// How a single generation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Answered,
    Empty,
    Failed,
}

/// Stateless generator; every call is one attempt with no history
pub struct ResponseGenerator {
    llm: Arc<dyn LlmService>,
    prompt: SystemPrompt,
}

impl ResponseGenerator {
    pub fn new(llm: Arc<dyn LlmService>, prompt: SystemPrompt) -> Self {
        Self { llm, prompt }
    }

    /// Generate the assistant's reply to `utterance`
    pub async fn respond(&self, utterance: &str) -> String {
        let (text, outcome) = self.respond_with_outcome(utterance).await;
        tracing::debug!(outcome = ?outcome, chars = text.len(), "Reply generated");
        text
    }

    pub async fn respond_with_outcome(&self, utterance: &str) -> (String, ReplyOutcome) {
        let request = LlmRequest::single_turn(self.prompt.text(), utterance);

        match self.llm.complete(&request).await {
            // Whitespace-only text counts as empty, unlike a plain truthiness check
            Ok(response) => match response.usable_text() {
                Some(text) => (text.to_string(), ReplyOutcome::Answered),
                None => {
                    tracing::warn!(
                        model = %self.llm.model_id(),
                        finish_reason = response.finish_reason.as_deref().unwrap_or("none"),
                        "LLM returned no text"
                    );
                    (EMPTY_REPLY_FALLBACK.to_string(), ReplyOutcome::Empty)
                }
            },
            Err(e) => {
                tracing::error!(
                    model = %self.llm.model_id(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Error communicating with LLM"
                );
                (CONNECTION_FALLBACK.to_string(), ReplyOutcome::Failed)
            }
        }
    }

    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockLlmService;
    use crate::llm::{LlmError, LlmResponse, MessageRole};

    fn generator(mock: &Arc<MockLlmService>) -> ResponseGenerator {
        ResponseGenerator::new(mock.clone(), SystemPrompt::embedded())
    }

    #[tokio::test]
    async fn test_returns_service_text() {
        let mock = Arc::new(MockLlmService::new("mock"));
        mock.queue_text("Starter is $399/mo.");

        let (text, outcome) = generator(&mock)
            .respond_with_outcome("How much does it cost?")
            .await;
        assert_eq!(text, "Starter is $399/mo.");
        assert_eq!(outcome, ReplyOutcome::Answered);
    }

    #[tokio::test]
    async fn test_request_is_single_turn_with_system_prompt() {
        let mock = Arc::new(MockLlmService::new("mock"));
        mock.queue_text("ok");

        generator(&mock).respond("Is it ONC Certified?").await;

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.system.len(), 1);
        assert_eq!(request.system[0].text, SystemPrompt::embedded().text());
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].text, "Is it ONC Certified?");
    }

    #[tokio::test]
    async fn test_missing_text_uses_empty_fallback() {
        let mock = Arc::new(MockLlmService::new("mock"));
        mock.queue_response(LlmResponse::default());

        let (text, outcome) = generator(&mock).respond_with_outcome("hi").await;
        assert_eq!(text, EMPTY_REPLY_FALLBACK);
        assert_eq!(outcome, ReplyOutcome::Empty);
    }

    #[tokio::test]
    async fn test_empty_string_uses_empty_fallback() {
        let mock = Arc::new(MockLlmService::new("mock"));
        mock.queue_text("");

        assert_eq!(generator(&mock).respond("hi").await, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn test_whitespace_reply_uses_empty_fallback() {
        let mock = Arc::new(MockLlmService::new("mock"));
        mock.queue_text(" \n\t ");

        let (text, outcome) = generator(&mock).respond_with_outcome("hi").await;
        assert_eq!(text, EMPTY_REPLY_FALLBACK);
        assert_eq!(outcome, ReplyOutcome::Empty);
    }

    #[tokio::test]
    async fn test_any_error_uses_connection_fallback() {
        let errors = [
            LlmError::network("connection reset"),
            LlmError::auth("API key not valid"),
            LlmError::rate_limit("quota"),
            LlmError::unknown("Failed to parse response"),
        ];

        for error in errors {
            let mock = Arc::new(MockLlmService::new("mock"));
            mock.queue_error(error);

            let (text, outcome) = generator(&mock).respond_with_outcome("foo").await;
            assert_eq!(text, CONNECTION_FALLBACK);
            assert_eq!(outcome, ReplyOutcome::Failed);
            assert_eq!(mock.request_count(), 1, "exactly one attempt");
        }
    }
}
