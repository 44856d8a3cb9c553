//! Contains the Error and Result type used by the parser and writer.
use std::fmt::Display;

/// Various errors that can occur while reading or writing SNBT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The text does not follow the grammar. `position` is the byte offset
    /// where parsing failed.
    Parse { position: usize },

    /// The text is well-formed but describes an invalid tree, eg a list
    /// mixing kinds or a `B` literal outside the range of a byte. `position`
    /// is the byte offset of the offending value.
    Structural { position: usize },

    /// A Rust value could not be lowered to a tag, or a tag could not be
    /// projected onto a Rust value.
    Value,

    /// Writing the text failed.
    Io,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input that the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self.kind {
            ErrorKind::Parse { position } | ErrorKind::Structural { position } => Some(position),
            _ => None,
        }
    }

    pub(crate) fn parse(position: usize, msg: impl Display) -> Self {
        Self {
            msg: format!("{} at {}", msg, position),
            kind: ErrorKind::Parse { position },
        }
    }

    pub(crate) fn structural(position: usize, msg: impl Display) -> Self {
        Self {
            msg: format!("{} at {}", msg, position),
            kind: ErrorKind::Structural { position },
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self {
            msg: format!("io error: {}", e),
            kind: ErrorKind::Io,
        }
    }
}

impl From<schemnbt::error::Error> for Error {
    fn from(e: schemnbt::error::Error) -> Self {
        Self {
            msg: e.to_string(),
            kind: ErrorKind::Value,
        }
    }
}
