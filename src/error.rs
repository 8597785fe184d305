//! Crate error types.
//!
//! Validation problems (`AnswerError::EmptyQuestion`, every `UtilityError`)
//! are ordinary outcomes shown inline on the page. `CompletionError` is the
//! typed failure of the one remote call the application makes.

use thiserror::Error;

/// Failure while assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY not set. Add it to .env or export it in the environment.")]
    MissingApiKey,
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    Temperature(f32),
}

/// Failure of a chat-completion call.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response (DNS, TLS, connect, timeout).
    #[error("could not reach the completion service: {0}")]
    Network(String),
    /// The service answered with a non-2xx status.
    #[error("completion service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    /// No API key was configured, so no request was sent.
    #[error("OPENAI_API_KEY not set. Add it to .env or export it in the environment.")]
    MissingCredential,
    /// The body was not a chat completion, or it carried no text.
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Short machine-readable tag used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Network(_) => "network",
            CompletionError::Api { .. } => "api",
            CompletionError::MissingCredential => "credential",
            CompletionError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CompletionError::Malformed(e.to_string())
        } else {
            CompletionError::Network(e.to_string())
        }
    }
}

/// Outcome of the answer generator other than an answer.
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("Please enter a question.")]
    EmptyQuestion,
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Validation failure in the utility panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtilityError {
    #[error("Please enter some text.")]
    EmptyText,
    #[error("Both height and weight are required.")]
    MissingFields,
    #[error("{field} must be a whole number.")]
    NotANumber { field: &'static str },
    #[error("Height must not be zero.")]
    ZeroHeight,
    #[error("Unknown mode: {0}")]
    UnknownMode(String),
}
