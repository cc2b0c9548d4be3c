use std::error;
use std::fmt;
use std::result;

/// A type alias for `Result<T, dsv_core::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur while assembling rows from lines.
///
/// Both kinds of error are fatal to the parse that produced them. There is
/// no attempt to recover a partial row: once an error is returned, the
/// parser that returned it must not be fed any more lines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    line: u64,
    column: u64,
}

/// The specific type of a parse error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A quoted field was closed but the next character that is not a
    /// space or a tab was not the delimiter.
    MissingDelimiter,
    /// The input ended (or a line ended with no newline configured for
    /// continuation) while a quoted field was still open.
    UnclosedQuotedField,
}

impl Error {
    pub(crate) fn missing_delimiter(line: u64, column: u64) -> Error {
        Error { kind: ErrorKind::MissingDelimiter, line, column }
    }

    pub(crate) fn unclosed_quoted_field(line: u64, column: u64) -> Error {
        Error { kind: ErrorKind::UnclosedQuotedField, line, column }
    }

    /// Return the specific type of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The 1-based physical line on which the error was detected.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The 1-based column (in characters) at which the error was detected.
    ///
    /// For an unclosed quoted field detected in the middle of the input,
    /// this is the position just past the last character of the line.
    pub fn column(&self) -> u64 {
        self.column
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::MissingDelimiter => write!(
                f,
                "Missing delimiter (line #{}, col #{}).",
                self.line, self.column
            ),
            ErrorKind::UnclosedQuotedField => write!(
                f,
                "Unclosed quoted field (line #{}, col #{}).",
                self.line, self.column
            ),
        }
    }
}
