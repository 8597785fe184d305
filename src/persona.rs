use crate::providers::{ChatMessage, Role};

/// Instruction used when the persona choice matches no known label.
pub const DEFAULT_INSTRUCTION: &str = "You are a kind and helpful assistant.";

/// An expert role whose fixed instruction conditions the model's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    CulinaryExpert,
    WorkingEngineer,
}

impl Persona {
    /// Both personas, in the order the page offers them.
    pub const ALL: [Persona; 2] = [Persona::CulinaryExpert, Persona::WorkingEngineer];

    pub fn label(&self) -> &'static str {
        match self {
            Persona::CulinaryExpert => "culinary expert",
            Persona::WorkingEngineer => "working engineer",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Persona::CulinaryExpert => {
                "You are a professional culinary researcher. Teach delicious recipes \
                 and practical tips that even a beginner can cook."
            }
            Persona::WorkingEngineer => {
                "You are an experienced programming instructor. Answer technical \
                 questions logically and in a way that beginners can understand."
            }
        }
    }

    /// Exact, case-sensitive match on the label.
    pub fn from_label(label: &str) -> Option<Persona> {
        Persona::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Instruction for a raw persona choice; unknown choices get [`DEFAULT_INSTRUCTION`].
pub fn system_instruction(choice: &str) -> &'static str {
    Persona::from_label(choice)
        .map(|p| p.instruction())
        .unwrap_or(DEFAULT_INSTRUCTION)
}

/// The (system instruction, user text) pair sent for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Exactly two messages: system first, then user.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage { role: Role::System, content: self.system.clone() },
            ChatMessage { role: Role::User, content: self.user.clone() },
        ]
    }
}

pub fn build_prompt(choice: &str, user_text: &str) -> Prompt {
    Prompt {
        system: system_instruction(choice).to_string(),
        user: user_text.to_string(),
    }
}
