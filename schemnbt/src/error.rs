//! Contains the Error and Result type used throughout the crate.
use std::fmt::Display;

/// An error produced while decoding, encoding, or building tags.
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
    /// The binary input ended part way through a tag.
    UnexpectedEof,

    /// A discriminator byte that the registry has no kind bound to. Decoding
    /// cannot skip such a tag since its length depends on its kind.
    UnknownTagKind(u8),

    /// A string payload was not valid UTF-8. Contains the offending bytes.
    InvalidEncoding(Vec<u8>),

    /// An id was registered twice without asking to overwrite.
    DuplicateRegistration(u8),

    /// A bit-level operation was asked for at a width the array cannot
    /// address. Contains the requested width.
    MalformedArrayWidth(u32),

    /// The data is well-formed bytes or values but not a valid tag tree, eg a
    /// list mixing kinds or a root with more than one entry.
    Structural,

    /// IO failure other than running out of input.
    Io,

    /// Any other errors, such as custom serde messages. Users should not match
    /// on this variant and should instead use a wildcard `_`.
    Other,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self {
            msg: "eof: unexpectedly ran out of input".into(),
            kind: ErrorKind::UnexpectedEof,
        }
    }

    pub(crate) fn unknown_tag(id: u8) -> Self {
        Self {
            msg: format!("unknown tag kind: {}", id),
            kind: ErrorKind::UnknownTagKind(id),
        }
    }

    pub(crate) fn nonunicode(data: Vec<u8>) -> Self {
        Self {
            msg: format!(
                "invalid string, non-unicode: {}",
                String::from_utf8_lossy(&data)
            ),
            kind: ErrorKind::InvalidEncoding(data),
        }
    }

    pub(crate) fn duplicate_registration(id: u8, existing: impl Display) -> Self {
        Self {
            msg: format!("{} already registered for id {}", existing, id),
            kind: ErrorKind::DuplicateRegistration(id),
        }
    }

    pub(crate) fn array_width(width: u32, backing: u32) -> Self {
        Self {
            msg: format!(
                "cannot address {}-bit values in an array of {}-bit words",
                width, backing
            ),
            kind: ErrorKind::MalformedArrayWidth(width),
        }
    }

    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::Structural,
        }
    }

    pub(crate) fn bespoke(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::Other,
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
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::unexpected_eof(),
            _ => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io,
            },
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::bespoke(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::bespoke(msg.to_string())
    }
}
