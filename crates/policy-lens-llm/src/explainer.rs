//! Contract explanations and question answering over a chat client.

use tracing::debug;

use crate::client::{ChatClient, ChatRequest, LlmError, LlmResult};
use crate::excerpt::{excerpt, DEFAULT_EXCERPT_BUDGET};
use crate::prompts::{make_analysis_prompt, AnalysisContext, QUESTION_SYSTEM_PROMPT, SYSTEM_PROMPT};

/// Builds prompts and forwards them to a [`ChatClient`].
pub struct Explainer<C> {
    client: C,
    excerpt_budget: usize,
}

impl<C: ChatClient> Explainer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            excerpt_budget: DEFAULT_EXCERPT_BUDGET,
        }
    }

    /// Characters of contract text sent with each analysis.
    pub fn with_excerpt_budget(mut self, budget: usize) -> Self {
        self.excerpt_budget = budget;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Three-part explanation of one contract.
    pub fn explain_contract(
        &self,
        text: &str,
        context: Option<&AnalysisContext>,
    ) -> LlmResult<String> {
        let cut = excerpt(text, self.excerpt_budget);
        let prompt = make_analysis_prompt(cut, context);
        debug!(
            excerpt_chars = cut.chars().count(),
            prompt_chars = prompt.chars().count(),
            "requesting contract explanation"
        );
        self.client.complete(&ChatRequest::new(SYSTEM_PROMPT, prompt))
    }

    /// Answer a free-form question about coverage.
    pub fn answer_question(&self, question: &str) -> LlmResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(LlmError::Other("question is empty".to_string()));
        }
        self.client
            .complete(&ChatRequest::new(QUESTION_SYSTEM_PROMPT, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockClient, Role};

    #[test]
    fn test_explain_contract_sends_bounded_excerpt() {
        let client = MockClient::new("1. LAMal ...");
        let explainer = Explainer::new(client.clone()).with_excerpt_budget(5);

        let reply = explainer.explain_contract("LAMal et LCA", None).unwrap();
        assert_eq!(reply, "1. LAMal ...");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].messages[0].content, SYSTEM_PROMPT);
        let user = requests[0].last_user_message().unwrap();
        assert!(user.contains("\"\"\"\nLAMal\n\"\"\""));
        assert!(!user.contains("LCA\n\"\"\""));
    }

    #[test]
    fn test_explain_contract_with_context() {
        let client = MockClient::new("ok");
        let explainer = Explainer::new(&client);
        let context = AnalysisContext {
            note: 5,
            scale: 10,
            ..AnalysisContext::default()
        };

        explainer.explain_contract("texte", Some(&context)).unwrap();
        let user = client.requests()[0].last_user_message().unwrap().to_string();
        assert!(user.contains("5/10"));
    }

    #[test]
    fn test_answer_question() {
        let mut client = MockClient::default();
        client.add_response("franchise", "300 CHF");
        let explainer = Explainer::new(client);

        assert_eq!(
            explainer.answer_question("Quelle est ma franchise ?").unwrap(),
            "300 CHF"
        );
        assert_eq!(
            explainer.client().requests()[0].messages[0].content,
            QUESTION_SYSTEM_PROMPT
        );
    }

    #[test]
    fn test_empty_question_is_rejected_without_a_call() {
        let explainer = Explainer::new(MockClient::default());
        assert!(matches!(
            explainer.answer_question("   "),
            Err(LlmError::Other(_))
        ));
        assert_eq!(explainer.client().call_count(), 0);
    }

    #[test]
    fn test_client_errors_propagate() {
        let mut client = MockClient::default();
        client.add_error("Texte du contrat");
        let explainer = Explainer::new(client);
        assert!(explainer.explain_contract("x", None).is_err());
    }
}
