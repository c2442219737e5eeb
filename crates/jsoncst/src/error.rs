//! Non-fatal parse diagnostics.
//!
//! Every variant is recoverable by construction: the engine records the
//! position, materializes an error leaf (or an incomplete node) and keeps
//! parsing. Whether any of these should block further processing is a
//! policy decision for the caller.

use core::ops::Range;

use thiserror::Error;

/// The category of a recorded parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// No token rule matched at this position. The offending bytes become a
    /// single error leaf and scanning resumes after them.
    #[error("no token rule matches")]
    Lex,
    /// A lexically valid token was not permitted in the current parser
    /// state. The token is kept as an error leaf and parsing retries with
    /// the next one.
    #[error("unexpected token")]
    Syntax,
    /// Input ended before an open construct was closed. The construct is
    /// kept, marked incomplete by the absence of its closing delimiter.
    #[error("unterminated construct at end of input")]
    Truncated,
}

/// A recorded diagnostic with the byte range it refers to.
///
/// For [`ParseErrorKind::Lex`] and [`ParseErrorKind::Syntax`] the range is
/// the text of the error leaf; for [`ParseErrorKind::Truncated`] it spans
/// the whole incomplete construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {}..{}", range.start, range.end)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// The affected byte range of the input.
    pub range: Range<usize>,
}
