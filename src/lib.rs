//! Persona Desk: ask an LLM expert persona a question from a small web page,
//! next to a utility panel for character counts and BMI.

pub mod answer;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod persona;
pub mod providers;
pub mod utility;
pub mod web;

pub use answer::{Answer, AnswerGenerator};
pub use completion::{ChatBackend, OpenAiClient};
pub use config::Config;
pub use error::{AnswerError, CompletionError, ConfigError, UtilityError};
pub use persona::{build_prompt, system_instruction, Persona, Prompt, DEFAULT_INSTRUCTION};
