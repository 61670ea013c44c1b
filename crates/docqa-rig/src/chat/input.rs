//! Interpretation of a line typed at the chat prompt.

/// Words that end the chat session.
const EXIT_COMMANDS: [&str; 3] = ["sair", "exit", "quit"];

/// What a line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// End the session.
    Exit,
    /// Nothing to do; prompt again.
    Skip,
    /// A question to answer (trimmed).
    Question(String),
}

impl ChatInput {
    /// Parses a raw input line.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Skip;
        }

        let lowered = trimmed.to_lowercase();
        if EXIT_COMMANDS.contains(&lowered.as_str()) {
            return Self::Exit;
        }

        Self::Question(trimmed.to_owned())
    }
}
