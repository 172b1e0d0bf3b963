//! The single error type that every fallible interpreter operation returns.

use std::fmt;

/// Kind of failure, per the taxonomy in the error handling design.
///
/// These are kinds, not Rust types: every failure mode the interpreter can hit
/// is bucketed into exactly one of these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed line, unmatched `end`, bad parameter declaration, bad token sequence.
    Syntax,
    /// Invalid cast into a declared type, comparison across incompatible kinds, division by zero.
    Value,
    /// Wrong number of arguments at a call site.
    Argument,
    /// Any other execution failure that is neither a parse nor a value failure.
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Syntax => "Syntax",
            Self::Value => "Value",
            Self::Argument => "Argument",
            Self::Runtime => "Runtime",
        };
        write!(f, "{name}")
    }
}

/// A BinP interpreter error, carrying enough context to render the
/// `"<Kind> Error on line <N>: <message>\n<line text>"` shape required at the
/// driver boundary.
#[derive(Debug, Clone)]
pub struct BinpError {
    kind: ErrorKind,
    /// 1-indexed line number, for user-facing output.
    line_num: usize,
    line_text: String,
    message: String,
}

impl BinpError {
    /// `line_num` is the internal 0-based index; this stores and renders the 1-indexed form.
    pub fn new(kind: ErrorKind, line_num: usize, line_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            line_num: line_num + 1,
            line_text: line_text.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn line_num(&self) -> usize {
        self.line_num
    }
}

impl fmt::Display for BinpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Error on line {}: {}\n{}", self.kind, self.line_num, self.message, self.line_text)
    }
}

impl std::error::Error for BinpError {}

pub type BinpResult<T> = Result<T, BinpError>;

/// Shorthand for constructing an `Err(BinpError::new(..))` with a formatted message,
/// mirroring the teacher's `exc_err_fmt!` macro.
macro_rules! err_fmt {
    ($kind:expr; $line_num:expr, $line_text:expr; $($arg:tt)*) => {
        return Err($crate::error::BinpError::new($kind, $line_num, $line_text, format!($($arg)*)))
    };
}

pub(crate) use err_fmt;
