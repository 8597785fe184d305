use tracing::{info, warn};

use crate::completion::ChatBackend;
use crate::error::AnswerError;
use crate::persona::build_prompt;

/// A completed answer, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub persona: String,
    pub text: String,
}

impl Answer {
    /// Heading shown above the answer, naming the chosen expert.
    pub fn heading(&self) -> String {
        format!("Answer from the {}", self.persona)
    }
}

/// Turns a question and persona choice into one completion call.
pub struct AnswerGenerator<B> {
    backend: B,
}

impl<B: ChatBackend> AnswerGenerator<B> {
    pub fn new(backend: B) -> Self {
        AnswerGenerator { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// An empty question is rejected before any request is made.
    pub async fn generate(&self, user_input: &str, persona_choice: &str) -> Result<Answer, AnswerError> {
        if user_input.is_empty() {
            return Err(AnswerError::EmptyQuestion);
        }

        let prompt = build_prompt(persona_choice, user_input);
        match self.backend.complete(&prompt).await {
            Ok(text) => {
                info!(persona = persona_choice, chars = text.chars().count(), "answer generated");
                Ok(Answer { persona: persona_choice.to_string(), text })
            }
            Err(e) => {
                warn!(persona = persona_choice, error = %e, "completion failed");
                Err(e.into())
            }
        }
    }
}
