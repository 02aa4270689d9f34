//! Command definitions
//!
//! Represents commands from clients.

/// Command verbs as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Create,
    Write,
    Read,
    Delete,
    List,
    Quit,
}

impl CommandType {
    /// Wire spelling of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Create => "CREATE",
            CommandType::Write => "WRITE",
            CommandType::Read => "READ",
            CommandType::Delete => "DELETE",
            CommandType::List => "LIST",
            CommandType::Quit => "QUIT",
        }
    }

    /// Parse a verb, ignoring case
    pub fn parse(verb: &str) -> Option<Self> {
        match verb.to_ascii_uppercase().as_str() {
            "CREATE" => Some(CommandType::Create),
            "WRITE" => Some(CommandType::Write),
            "READ" => Some(CommandType::Read),
            "DELETE" => Some(CommandType::Delete),
            "LIST" => Some(CommandType::List),
            "QUIT" => Some(CommandType::Quit),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty file
    Create { name: String },

    /// Replace a file's contents
    Write { name: String, content: String },

    /// Read a file's contents
    Read { name: String },

    /// Delete a file
    Delete { name: String },

    /// List all file names
    List,

    /// End the session
    Quit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Create { .. } => CommandType::Create,
            Command::Write { .. } => CommandType::Write,
            Command::Read { .. } => CommandType::Read,
            Command::Delete { .. } => CommandType::Delete,
            Command::List => CommandType::List,
            Command::Quit => CommandType::Quit,
        }
    }
}
