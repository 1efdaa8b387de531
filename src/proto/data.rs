use std::fmt::Display;

use serde::Serialize;

#[derive(Copy, Clone, Serialize, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// The server sent something we can't interpret: an unknown header,
    /// a malformed number, or a name/card we know nothing about.
    ProtocolViolation,

    /// A `players` message repeats a name.
    RegistrationConflict,

    /// The server asked for a decision we can't make in the current state.
    PreconditionViolation,

    NetworkError,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::ProtocolViolation => "protocol violation",
            ErrorCode::RegistrationConflict => "registration conflict",
            ErrorCode::PreconditionViolation => "precondition violation",
            ErrorCode::NetworkError => "network error",
        };
        write!(f, "{}", s)
    }
}

/// A fatal condition. Once raised the session is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorCode::NetworkError, e.to_string())
    }
}
