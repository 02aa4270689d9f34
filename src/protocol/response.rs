//! Response definitions
//!
//! Represents responses to clients.

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

impl Status {
    /// Line prefix for this status, without the trailing space
    pub fn prefix(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS:",
            Status::Error => "ERROR:",
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status
    pub status: Status,

    /// Text after the status prefix
    pub message: String,
}

impl Response {
    /// Create a SUCCESS response
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    /// Create an ERROR response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
